mod category_image_cache;

pub use category_image_cache::{
    CategoryImageCache, DEFAULT_BATCH_PAUSE, DEFAULT_BATCH_SIZE, DEFAULT_LARGE_WIDTH,
    DEFAULT_MAX_ITEMS, DEFAULT_QUALITY, DEFAULT_THUMBNAIL_WIDTH, PreloadConfig,
};
