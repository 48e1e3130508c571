//! View layer: egui panels and charts. Holds no aggregation logic; everything
//! drawn comes from [`crate::dashboard::Dashboard`].

pub mod panels;
pub mod plot;
