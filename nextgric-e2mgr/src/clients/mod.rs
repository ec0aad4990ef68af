//! Clients of external services.

mod routing_manager;

pub use routing_manager::{
    HttpRoutingManagerClient, RoutingManagerClient, RoutingManagerClientError,
    RoutingManagerDeleteRequest, RoutingManagerE2TData, ADD_E2T_INSTANCE_PATH,
    ASSOCIATE_RAN_TO_E2T_INSTANCE_PATH, DELETE_E2T_INSTANCE_PATH,
    DISSOCIATE_RAN_E2T_INSTANCE_PATH,
};
