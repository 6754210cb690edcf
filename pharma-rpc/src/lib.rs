//! gRPC clients for the product and payment services.

pub mod proto {
    pub mod product {
        tonic::include_proto!("product");
    }

    pub mod payment {
        tonic::include_proto!("payment");
    }
}

mod grpc;
pub mod product_client;
pub mod payment_client;

pub use payment_client::GrpcPaymentAdapter;
pub use product_client::GrpcProductCatalog;
