mod data_store_port;
mod image_prefetch_port;
mod media_url_port;

pub use data_store_port::DataStorePort;
pub use image_prefetch_port::ImagePrefetchPort;
pub use media_url_port::MediaUrlPort;

#[cfg(test)]
pub use data_store_port::MockDataStorePort;
#[cfg(test)]
pub use image_prefetch_port::MockImagePrefetchPort;
#[cfg(test)]
pub use media_url_port::MockMediaUrlPort;

#[cfg(test)]
pub mod mocks {
    pub use super::data_store_port::mock::FakeDataStore;
    pub use super::image_prefetch_port::mock::RecordingPrefetcher;
    pub use super::media_url_port::mock::FakeMediaUrls;
}
