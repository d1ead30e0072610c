use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    delete_reservation, register_reservation, show_occupied_times, show_reservation,
    show_reservation_list, update_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", post(register_reservation))
        .route("/", get(show_reservation_list))
        .route("/occupied-times", get(show_occupied_times))
        .route("/:reservation_id", get(show_reservation))
        .route("/:member_id/:reservation_id", put(update_reservation))
        .route("/:member_id/:reservation_id", delete(delete_reservation));

    Router::new().nest("/reservations", reservation_routers)
}
