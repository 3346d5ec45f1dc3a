// SPDX-License-Identifier: GPL-3.0-only
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{PluginError, PluginResult, RemoteError};

/// Run one remote call, racing it against the caller's cancellation token.
///
/// The call future is dropped when the token fires first, so a cancelled call
/// never completes with a value. Remote failures surface as `PluginError::Remote`
/// carrying only the unwrapped service error.
pub async fn dispatch<T, F>(
    method: &'static str,
    cancellable: &CancellationToken,
    call: F,
) -> PluginResult<T>
where
    F: Future<Output = Result<T, RemoteError>>,
{
    if cancellable.is_cancelled() {
        debug!(method, "Not dispatching store call, already cancelled");
        return Err(PluginError::Cancelled);
    }

    debug!(method, "Dispatching store call");
    tokio::select! {
        biased;
        _ = cancellable.cancelled() => {
            warn!(method, "Store call cancelled");
            Err(PluginError::Cancelled)
        }
        reply = call => reply.map_err(|err| {
            debug!(method, error = %err, remote_name = ?err.name, "Store call failed");
            PluginError::Remote(err)
        }),
    }
}
