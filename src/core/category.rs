/// POI 類別在地點服務上的對應方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProfile {
    /// 服務端的類型過濾條件
    pub place_type: Option<&'static str>,
    /// 沒有對應類型時附加到關鍵字的描述詞
    pub extra_keywords: &'static str,
}

const NO_PROFILE: CategoryProfile = CategoryProfile {
    place_type: None,
    extra_keywords: "",
};

const fn typed(place_type: &'static str) -> CategoryProfile {
    CategoryProfile {
        place_type: Some(place_type),
        extra_keywords: "",
    }
}

const fn keywords(extra_keywords: &'static str) -> CategoryProfile {
    CategoryProfile {
        place_type: None,
        extra_keywords,
    }
}

static CATEGORY_TABLE: &[(&str, CategoryProfile)] = &[
    ("bakery", typed("bakery")),
    ("cafe", typed("cafe")),
    ("restaurant", typed("restaurant")),
    ("park", typed("park")),
    ("school", typed("school")),
    ("hospital", typed("hospital")),
    ("gym", typed("gym")),
    ("shopping", typed("shopping_mall")),
    (
        "culture",
        keywords(" museo galleria arte teatro biblioteca cinema"),
    ),
    ("coworking", keywords(" coworking spazio studio hub")),
];

pub fn category_profile(category: &str) -> CategoryProfile {
    CATEGORY_TABLE
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, profile)| *profile)
        .unwrap_or(NO_PROFILE)
}

/// 附近搜尋的關鍵字：名稱加上類別描述詞
pub fn proximity_keyword(name: &str, category: &str) -> String {
    let keyword = format!("{}{}", name.trim(), category_profile(category).extra_keywords);
    keyword.trim().to_string()
}
