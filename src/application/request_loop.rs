//! Line-delimited JSON request loop.
//!
//! Each input line is a `PredictionRequest` or the word `health`. Requests run
//! concurrently and each gets exactly one reply line, written in completion
//! order and tagged with a request id. When input ends or shutdown fires, no
//! further lines are read, but every request already accepted is answered.

use crate::application::prediction_service::{PredictionRequest, PredictionService};
use serde_json::{Value, json};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

async fn handle_line(service: PredictionService, line: String) -> Value {
    let request_id = Uuid::new_v4();
    debug!("Request {} received ({} bytes)", request_id, line.len());

    if line.trim().trim_matches('"') == "health" {
        return json!({ "request_id": request_id, "health": service.health() });
    }

    match serde_json::from_str::<PredictionRequest>(&line) {
        Ok(request) => match service.predict(request).await {
            Ok(response) => json!({ "request_id": request_id, "prediction": response }),
            Err(e) => json!({
                "request_id": request_id,
                "error": e.to_string(),
                "client_error": e.is_client_error(),
            }),
        },
        Err(e) => {
            warn!("Request {} is not valid JSON: {}", request_id, e);
            json!({
                "request_id": request_id,
                "error": format!("Malformed request: {}", e),
                "client_error": true,
            })
        }
    }
}

async fn write_reply<W: AsyncWrite + Unpin>(
    writer: &mut W,
    reply: Result<Value, JoinError>,
) -> std::io::Result<()> {
    let reply = reply.unwrap_or_else(|e| {
        error!("Request handler failed: {}", e);
        json!({ "error": format!("Request handler failed: {}", e), "client_error": false })
    });
    writer.write_all(format!("{}\n", reply).as_bytes()).await?;
    writer.flush().await
}

/// Serves requests from `reader` until it ends or `shutdown` completes, then
/// drains in-flight requests. Returns the number of replies written.
pub async fn serve<R, W, S>(
    service: PredictionService,
    reader: R,
    mut writer: W,
    shutdown: S,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = reader.lines();
    let mut pending = JoinSet::new();
    let mut replies = 0;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    pending.spawn(handle_line(service.clone(), line));
                }
                None => {
                    info!("Input closed.");
                    break;
                }
            },
            Some(reply) = pending.join_next(), if !pending.is_empty() => {
                write_reply(&mut writer, reply).await?;
                replies += 1;
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    if !pending.is_empty() {
        info!("Waiting for {} in-flight requests...", pending.len());
    }
    while let Some(reply) = pending.join_next().await {
        write_reply(&mut writer, reply).await?;
        replies += 1;
    }

    Ok(replies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::PricePredictor;
    use crate::config::ServiceEnvConfig;
    use crate::domain::errors::PredictionError;
    use crate::domain::market::CandlePoint;
    use crate::domain::ports::RegressionModel;
    use std::sync::Arc;
    use std::time::Duration;

    /// Mean of the training targets, with a slow fit.
    struct SlowMeanModel {
        mean: Option<f64>,
    }

    impl RegressionModel for SlowMeanModel {
        fn fit(&mut self, _inputs: &[Vec<f64>], targets: &[f64]) -> Result<(), PredictionError> {
            std::thread::sleep(Duration::from_millis(100));
            self.mean = Some(targets.iter().sum::<f64>() / targets.len() as f64);
            Ok(())
        }

        fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
            let mean = self.mean.ok_or_else(|| PredictionError::InferenceFailure {
                reason: "unfitted".to_string(),
            })?;
            Ok(vec![mean; inputs.len()])
        }

        fn name(&self) -> &str {
            "slow-mean"
        }
    }

    fn service() -> PredictionService {
        let predictor = PricePredictor::new(20, Box::new(SlowMeanModel { mean: None }));
        PredictionService::new(Arc::new(predictor), ServiceEnvConfig::default())
    }

    fn request_line(symbol: &str) -> String {
        let candles: Vec<CandlePoint> = (0..150)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.4).sin() * 2.0 + i as f64 * 0.03;
                CandlePoint::new(
                    i as i64 * 3_600_000,
                    close - 0.1,
                    close + 0.8,
                    close - 0.9,
                    close,
                    900.0 + (i % 5) as f64 * 30.0,
                )
            })
            .collect();
        json!({ "candles": candles, "symbol": symbol }).to_string()
    }

    fn parse_replies(output: &[u8]) -> Vec<Value> {
        String::from_utf8(output.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_every_request_answered_after_input_ends() {
        let input = format!(
            "{}\n{}\n\n{}\nhealth\n",
            request_line("AAA"),
            request_line("BBB"),
            request_line("CCC")
        );
        let mut output = Vec::new();

        let written = serve(
            service(),
            input.as_bytes(),
            &mut output,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        assert_eq!(written, 4);
        let replies = parse_replies(&output);
        assert_eq!(replies.len(), 4);

        let mut symbols: Vec<&str> = replies
            .iter()
            .filter_map(|r| r["prediction"]["symbol"].as_str())
            .collect();
        symbols.sort();
        assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);
        assert_eq!(replies.iter().filter(|r| r.get("health").is_some()).count(), 1);
        assert!(replies.iter().all(|r| r.get("error").is_none()));
    }

    #[tokio::test]
    async fn test_shutdown_still_drains_accepted_requests() {
        let input = format!("{}\n", request_line("AAA"));
        let mut output = Vec::new();

        // Shutdown is ready immediately, so at most the first line is read
        let written = serve(service(), input.as_bytes(), &mut output, async {})
            .await
            .unwrap();

        assert_eq!(parse_replies(&output).len(), written);
    }

    #[tokio::test]
    async fn test_malformed_line_gets_client_error() {
        let mut output = Vec::new();
        serve(
            service(),
            "{not json\n".as_bytes(),
            &mut output,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        let replies = parse_replies(&output);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["client_error"], json!(true));
        assert!(replies[0]["request_id"].is_string());
    }
}
