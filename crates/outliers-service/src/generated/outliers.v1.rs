// @generated
// Generated from: proto/outliers/v1/outliers.proto
// Manual check-in for offline builds.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Metric {
    #[prost(message, optional, tag = "1")]
    pub time: ::core::option::Option<Timestamp>,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(double, tag = "3")]
    pub value: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutliersRequest {
    #[prost(message, repeated, tag = "1")]
    pub metrics: ::prost::alloc::vec::Vec<Metric>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutliersResponse {
    #[prost(int32, repeated, tag = "1")]
    pub indices: ::prost::alloc::vec::Vec<i32>,
}

pub mod outliers_client {
    #![allow(clippy::derive_partial_eq_without_eq)]
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct OutliersClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl OutliersClient<tonic::transport::Channel> {
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> OutliersClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
        <T::ResponseBody as Body>::Data: Into<Bytes> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub async fn detect(
            &mut self,
            request: impl tonic::IntoRequest<super::OutliersRequest>,
        ) -> Result<tonic::Response<super::OutliersResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/outliers.v1.Outliers/Detect",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
}

pub mod outliers_server {
    #![allow(clippy::derive_partial_eq_without_eq)]
    use tonic::codegen::*;

    #[tonic::async_trait]
    pub trait Outliers: Send + Sync + 'static {
        async fn detect(
            &self,
            request: tonic::Request<super::OutliersRequest>,
        ) -> Result<tonic::Response<super::OutliersResponse>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct OutliersServer<T: Outliers> {
        inner: Arc<T>,
    }

    impl<T: Outliers> Clone for OutliersServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<T: Outliers> OutliersServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }
    }

    impl<T: Outliers> Service<http::Request<tonic::body::BoxBody>> for OutliersServer<T> {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<tonic::body::BoxBody>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/outliers.v1.Outliers/Detect" => {
                    struct DetectSvc<T: Outliers>(pub Arc<T>);
                    impl<T: Outliers> tonic::server::UnaryService<super::OutliersRequest> for DetectSvc<T> {
                        type Response = super::OutliersResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::OutliersRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.detect(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = DetectSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::empty_body())
                        .unwrap())
                }),
            }
        }
    }

    impl<T: Outliers> tonic::server::NamedService for OutliersServer<T> {
        const NAME: &'static str = "outliers.v1.Outliers";
    }
}
