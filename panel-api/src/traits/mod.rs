pub mod key_extractor;
