pub mod analyze;
pub mod health;
pub mod pages;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(pages::config)
        .configure(health::config)
        .configure(analyze::config);
}
