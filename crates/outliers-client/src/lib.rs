//! Typed client for the `outliers.v1.Outliers/Detect` RPC.
//!
//! Wraps the generated tonic client with the domain `Metric` type and a
//! failure taxonomy that keeps connection faults, cancellations, and
//! server-reported errors distinguishable at the call site.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use outliers_core::Metric;
use outliers_service::pb::outliers::v1::outliers_client::OutliersClient;
use outliers_service::pb::outliers::v1::{
    Metric as MetricMessage, OutliersRequest, Timestamp as TimestampMessage,
};
use std::time::Duration;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Request, Status};

/// Client-side failure taxonomy for a `Detect` call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport connection could not be established or maintained.
    #[error("connection failed: {0}")]
    Connection(#[from] tonic::transport::Error),
    /// The call was aborted by a caller-supplied deadline or cancellation.
    #[error("call cancelled or deadline exceeded: {0}")]
    Cancelled(Status),
    /// The server explicitly reported a failure.
    #[error("server reported failure: {0}")]
    Rpc(Status),
}

impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::Cancelled | Code::DeadlineExceeded => Self::Cancelled(status),
            _ => Self::Rpc(status),
        }
    }
}

/// Owns the channel to one detection server. Dropping the client releases
/// the connection on every exit path.
#[derive(Debug, Clone)]
pub struct DetectClient {
    inner: OutliersClient<Channel>,
}

impl DetectClient {
    /// Connect to `target`, e.g. `http://127.0.0.1:9999`.
    pub async fn connect(target: impl Into<String>) -> Result<Self, ClientError> {
        let channel = Endpoint::from_shared(target.into())?.connect().await?;
        Ok(Self {
            inner: OutliersClient::new(channel),
        })
    }

    /// Invoke `Detect` and return the flagged indices.
    ///
    /// A timeout rides the request as a gRPC deadline so the server can
    /// abandon the call, and is enforced locally as well: the waiting caller
    /// is always released with `ClientError::Cancelled` when it expires.
    pub async fn detect(
        &mut self,
        metrics: &[Metric],
        timeout: Option<Duration>,
    ) -> Result<Vec<i32>, ClientError> {
        let mut request = Request::new(OutliersRequest {
            metrics: metrics.iter().map(metric_to_message).collect(),
        });
        if let Some(limit) = timeout {
            request.set_timeout(limit);
        }

        let call = self.inner.detect(request);
        let response = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ClientError::Cancelled(Status::deadline_exceeded(
                        "deadline elapsed before the server responded",
                    )))
                }
            },
            None => call.await?,
        };

        Ok(response.into_inner().indices)
    }
}

pub fn metric_to_message(metric: &Metric) -> MetricMessage {
    MetricMessage {
        time: Some(datetime_to_timestamp(metric.time)),
        name: metric.name.clone(),
        value: metric.value,
    }
}

fn datetime_to_timestamp(time: DateTime<Utc>) -> TimestampMessage {
    TimestampMessage {
        seconds: time.timestamp(),
        nanos: time.timestamp_subsec_nanos() as i32,
    }
}
