//! History demo: back-navigation, targeted unwinding, and path queries.

use endpoint_router::{Endpoint, Phase, Router};
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
    for name in ["home", "library", "album", "track"] {
        router.add_endpoint(Rc::new(Screen(name)));
    }

    let _log = router.use_hook(
        |transition| {
            println!(
                "  transition {} -> {}",
                transition.from_label(),
                transition.to_name()
            );
        },
        None,
        None,
        Phase::Middle,
    );

    router.go_to("home");
    router.go_to("library");
    router.go_to("album");
    router.go_to("track");
    println!("visited: {:?}", router.history());

    let unwind: Vec<String> = router
        .path_to_previous("home", false)
        .iter()
        .map(|endpoint| endpoint.name().to_string())
        .collect();
    println!("a back-unwind to home would discard: {:?}", unwind);

    // One transition, three entries discarded.
    router.go_back_to("home");
    println!("after go_back_to(home): {:?}", router.history());

    // Absent target: hard reset, no transition fires.
    router.go_to("library");
    router.go_back_to("track");
    println!("after reset to track: {:?}", router.history());
}
