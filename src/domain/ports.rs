use crate::domain::model::{DetailsResponse, SearchResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 以位置為中心的搜尋請求
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    pub lat: f64,
    pub lon: f64,
    pub radius: u32,
    pub keyword: String,
    pub place_type: Option<&'static str>,
}

/// 外部地點服務：兩個搜尋端點與一個詳細資料端點
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn nearby_search(&self, request: &NearbyRequest) -> Result<SearchResponse>;
    async fn text_search(&self, query: &str) -> Result<SearchResponse>;
    async fn place_details(&self, place_id: &str) -> Result<DetailsResponse>;
}

pub trait Storage: Send + Sync {
    /// 檔案不存在時回傳 `None`
    fn read_to_string(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    /// 以附加模式寫入一行，永不截斷既有內容
    fn append_line(
        &mut self,
        path: &str,
        line: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn report_path(&self) -> &str;
    fn radius(&self) -> u32;
    fn qps(&self) -> f64;
    /// 0 代表處理全部
    fn sample(&self) -> usize;
    fn poi_timeout_secs(&self) -> u64;
    fn base_url(&self) -> &str;
    fn language(&self) -> &str;
    fn region(&self) -> &str;
}
