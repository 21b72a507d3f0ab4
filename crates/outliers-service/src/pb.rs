//! Checked-in protobuf bindings for the `outliers.v1` package.

pub mod outliers {
    pub mod v1 {
        include!("generated/outliers.v1.rs");
    }
}
