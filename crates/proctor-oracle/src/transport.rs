//! Shared subprocess transport for oracle scripts.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use proctor_config::OracleConfig;

use crate::error::OracleError;

/// Invoke `script` as `<python> <script> <op> <json-params>` and parse its
/// stdout as JSON.
pub(crate) async fn call_oracle<P, R>(
    config: &OracleConfig,
    script: &str,
    op: &str,
    params: &P,
) -> Result<R, OracleError>
where
    P: Serialize,
    R: DeserializeOwned,
{
    if script.is_empty() {
        return Err(OracleError::Unconfigured(op.to_string()));
    }
    let params_json = serde_json::to_string(params)
        .map_err(|e| OracleError::MalformedOutput(format!("Failed to encode params: {e}")))?;

    debug!(script, op, timeout_secs = config.timeout_secs, "invoking oracle");

    let output = timeout(
        Duration::from_secs(config.timeout_secs),
        Command::new(&config.python_path)
            .arg(script)
            .arg(op)
            .arg(&params_json)
            .output(),
    )
    .await
    .map_err(|_| OracleError::Timeout {
        timeout_secs: config.timeout_secs,
    })??;

    if !output.status.success() {
        return Err(OracleError::NonZeroExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    serde_json::from_slice(&output.stdout).map_err(|e| {
        OracleError::MalformedOutput(format!(
            "{op} returned unparseable output: {e}: {}",
            String::from_utf8_lossy(&output.stdout)
        ))
    })
}
