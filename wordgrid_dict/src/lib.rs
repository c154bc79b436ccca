pub mod word_pool;
