//! AssetProvider 구현 모듈.

pub mod kis;

pub use kis::KisAssetProvider;
