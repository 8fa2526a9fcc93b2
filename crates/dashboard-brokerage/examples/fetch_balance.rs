//! 조립 지점 데모: 환경변수 설정으로 Provider를 구성해 잔고를 조회합니다.
//!
//! ```sh
//! KIS_APP_KEY=... KIS_APP_SECRET=... KIS_CANO=... \
//!     cargo run --example fetch_balance
//! ```

use std::sync::Arc;

use dashboard_brokerage::{FileStore, HttpTransport, KisAssetProvider, KisClient, KisConfig};
use dashboard_core::AssetProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Arc::new(KisConfig::from_env()?);
    let store = Arc::new(FileStore::new("kis_token.json"));
    let client = Arc::new(KisClient::new(HttpTransport::new(), config, store));
    let provider = KisAssetProvider::new(client);

    println!("--- 보유 종목 ---");
    match provider.fetch_holdings().await {
        Ok(holdings) => {
            for holding in &holdings {
                println!(
                    "[{:?}] {} ({}) 수량 {} 평가 {}",
                    holding.market,
                    holding.display_name,
                    holding.identifier,
                    holding.quantity,
                    holding.total_current_value,
                );
            }
        }
        Err(e) => eprintln!("보유 종목 조회 실패: {e}"),
    }

    println!("\n--- 계좌 요약 ---");
    match provider.fetch_account_summary().await {
        Ok(summary) => {
            println!(
                "원화 환산 총액 {} (국내 {}{}, 해외 {}{})",
                summary.total_value_krw,
                summary.domestic.currency_symbol,
                summary.domestic.total_asset_value,
                summary.overseas.currency_symbol,
                summary.overseas.total_asset_value,
            );
        }
        Err(e) => eprintln!("계좌 요약 조회 실패: {e}"),
    }

    Ok(())
}
