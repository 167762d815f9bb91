//! Middleware pipeline demo: scopes, phases, veto, deregistration.
//!
//! Run with `RUST_LOG=debug cargo run --example middleware_demo` to also see
//! the router's own log output.

use endpoint_router::{middleware_fn, Endpoint, Next, Phase, Router, Transition};
use std::rc::Rc;

struct Screen(&'static str);

impl Endpoint for Screen {
    fn name(&self) -> &str {
        self.0
    }
}

fn main() {
    env_logger::init();

    let router = Router::new();
    for name in ["home", "settings", "vault"] {
        router.add_endpoint(Rc::new(Screen(name)));
    }

    // Phase::From runs before anything endpoint-specific, on every transition.
    let audit = router.use_hook(
        |transition| {
            println!(
                "[audit] {} -> {}",
                transition.from_label(),
                transition.to_name()
            );
        },
        None,
        None,
        Phase::From,
    );

    // Scoped to arrivals at "settings" only.
    let _welcome = router.use_hook(
        |transition| println!("[settings] entered from {}", transition.from_label()),
        None,
        Some("settings"),
        Phase::Middle,
    );

    // Chain-controlled: vetoes any attempt to enter the vault from home.
    let _vault_guard = router.use_middleware(
        middleware_fn(|transition: Transition, next: &Next<'_, Transition>| {
            if transition.from_name() == Some("home") && transition.to_name() == "vault" {
                println!("[vault] blocked direct entry from home");
                return;
            }
            next.proceed(transition);
        }),
        None,
        Some("vault"),
        Phase::Middle,
    );

    // Cleanup-style: runs after everything else.
    let _trailer = router.use_hook(
        |transition| println!("[done] now at {}", transition.to_name()),
        None,
        None,
        Phase::To,
    );

    router.go_to("home");
    router.go_to("vault"); // the guard halts the chain, history still moves
    router.go_to("settings");
    router.go_to("vault"); // allowed from settings

    audit.remove();
    router.go_back(); // no more [audit] line for this one

    println!("history: {:?}", router.history());
}
