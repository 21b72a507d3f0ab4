use crate::pb::outliers::v1::outliers_server::{Outliers, OutliersServer};
use crate::pb::outliers::v1::{OutliersRequest, OutliersResponse};
use crate::ServiceState;
use outliers_core::{detect_outliers, DetectError};
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::info;

#[derive(Clone)]
pub struct GrpcApi {
    state: ServiceState,
}

impl GrpcApi {
    pub fn new(state: ServiceState) -> Self {
        Self { state }
    }
}

#[tonic::async_trait]
impl Outliers for GrpcApi {
    async fn detect(
        &self,
        request: Request<OutliersRequest>,
    ) -> Result<Response<OutliersResponse>, Status> {
        let metrics = request.into_inner().metrics;
        let values: Vec<f64> = metrics.iter().map(|metric| metric.value).collect();

        let indices =
            detect_outliers(&values, &self.state.detector).map_err(detect_error_to_status)?;

        info!(
            metrics = metrics.len(),
            outliers = indices.len(),
            "served detect call"
        );

        Ok(Response::new(OutliersResponse { indices }))
    }
}

fn detect_error_to_status(err: DetectError) -> Status {
    match err {
        DetectError::TooManyMetrics(_) => Status::invalid_argument(err.to_string()),
    }
}

pub async fn serve_grpc(state: ServiceState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let service = OutliersServer::new(GrpcApi::new(state));

    Server::builder()
        .add_service(service)
        .serve_with_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb::outliers::v1::{Metric, Timestamp};
    use crate::ServiceConfig;
    use prost::Message;
    use tonic::Code;

    fn api() -> GrpcApi {
        GrpcApi::new(ServiceState::new(ServiceConfig::default()))
    }

    fn metric(seconds: i64, value: f64) -> Metric {
        Metric {
            time: Some(Timestamp { seconds, nanos: 0 }),
            name: "CPU".to_string(),
            value,
        }
    }

    async fn detect(api: &GrpcApi, metrics: Vec<Metric>) -> Vec<i32> {
        api.detect(Request::new(OutliersRequest { metrics }))
            .await
            .unwrap()
            .into_inner()
            .indices
    }

    #[tokio::test]
    async fn detect_flags_injected_spikes() {
        let api = api();
        let mut metrics: Vec<Metric> = (0..100)
            .map(|i| metric(i, 10.0 + (i % 5) as f64))
            .collect();
        metrics[17].value = 500.0;

        assert_eq!(detect(&api, metrics).await, vec![17]);
    }

    #[tokio::test]
    async fn detect_on_empty_request_returns_empty_response() {
        let api = api();
        assert!(detect(&api, Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn detect_on_identical_values_returns_empty_response() {
        let api = api();
        let metrics = (0..10).map(|i| metric(i, 3.5)).collect();
        assert!(detect(&api, metrics).await.is_empty());
    }

    #[tokio::test]
    async fn detect_stays_usable_across_sequential_calls() {
        let api = api();
        let metrics: Vec<Metric> = (0..10).map(|i| metric(i, i as f64)).collect();
        let first = detect(&api, metrics.clone()).await;
        let second = detect(&api, metrics).await;
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_input_maps_to_invalid_argument() {
        let status = detect_error_to_status(DetectError::TooManyMetrics(usize::MAX));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("int32 index space"));
    }

    #[tokio::test]
    async fn detect_serves_valid_calls_after_a_rejected_one() {
        let api = api();

        // Drive the rejection path first, then a normal call on the same
        // handler instance.
        let status = detect_error_to_status(DetectError::TooManyMetrics(i32::MAX as usize + 1));
        assert_eq!(status.code(), Code::InvalidArgument);

        let mut metrics: Vec<Metric> = (0..50).map(|i| metric(i, 20.0)).collect();
        metrics[9].value = 400.0;
        assert_eq!(detect(&api, metrics).await, vec![9]);
    }

    #[test]
    fn request_round_trips_through_the_wire_encoding() {
        let request = OutliersRequest {
            metrics: vec![metric(1_700_000_000, 38.5), metric(1_700_000_001, 97.2)],
        };

        let bytes = request.encode_to_vec();
        let decoded = OutliersRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn truncated_request_fails_to_decode_without_panicking() {
        let request = OutliersRequest {
            metrics: (0..16).map(|i| metric(i, i as f64)).collect(),
        };

        let bytes = request.encode_to_vec();
        assert!(OutliersRequest::decode(&bytes[..bytes.len() - 3]).is_err());

        // A well-formed message still decodes afterwards.
        assert!(OutliersRequest::decode(bytes.as_slice()).is_ok());
    }
}
