//! Domain model and the client-held consultation engine for Virtual PMP.

pub mod consultation;
pub mod domain;
