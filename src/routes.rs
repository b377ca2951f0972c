use crate::{
    api::{calendar, employee, leave_balance, leave_request, work_schedule},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let preview_limiter = Arc::new(build_limiter(config.rate_preview_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(handlers::protected)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/preview — must register before /leave/{id}
                    .service(
                        web::resource("/preview")
                            .wrap(preview_limiter)
                            .route(web::get().to(leave_request::preview_workdays)),
                    )
                    // /leave/types — must register before /leave/{id}
                    .service(
                        web::resource("/types")
                            .route(web::get().to(leave_request::list_leave_types)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::put().to(leave_request::update_leave))
                            .route(web::delete().to(leave_request::delete_leave)),
                    )
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    // /leave/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::scope("/balance")
                    // /balance
                    .service(web::resource("").route(web::get().to(leave_balance::list_balances)))
                    // /balance/recalculate/{year}
                    .service(
                        web::resource("/recalculate/{year}")
                            .route(web::post().to(leave_balance::recalculate_year)),
                    )
                    // /balance/{id}
                    .service(
                        web::resource("/{id}").route(web::put().to(leave_balance::update_balance)),
                    ),
            )
            .service(
                web::scope("/calendar")
                    // /calendar
                    .service(
                        web::resource("")
                            .route(web::get().to(calendar::list_calendar))
                            .route(web::post().to(calendar::create_calendar_entry)),
                    )
                    // /calendar/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::delete().to(calendar::delete_calendar_entry)),
                    ),
            )
            .service(
                web::scope("/schedules")
                    // /schedules
                    .service(
                        web::resource("")
                            .route(web::get().to(work_schedule::list_schedules))
                            .route(web::post().to(work_schedule::create_schedule)),
                    )
                    // /schedules/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(work_schedule::get_schedule)),
                    ),
            ),
    );
}
