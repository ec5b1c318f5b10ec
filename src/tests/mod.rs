pub(crate) mod partial_delivery;
