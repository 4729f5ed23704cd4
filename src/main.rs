use std::rc::Rc;

use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

mod config;
mod composables {
    pub mod animation;
    pub mod content;
    pub mod dom;
    pub mod form;
    pub mod image_loader;
    pub mod multi_step_form;
    pub mod phone_validation;
    pub mod signals;
    pub mod timers;
    pub mod ui_state;
    pub mod youtube;
}
mod components {
    pub mod lead_form;
    pub mod phone_input;
    pub mod video_section;
}
mod pages {
    pub mod home;
}

use composables::dom::{scroll_for_location, use_dom, BrowserDom, ScrollOptions};
use pages::home::Home;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        }
        Route::NotFound => {
            info!("Unknown path, rendering Home page");
            html! { <Home /> }
        }
    }
}

/// Smooth scrolling on navigation: to the hash target if there is one,
/// otherwise back to the top.
#[function_component(ScrollOnNavigate)]
fn scroll_on_navigate() -> Html {
    let location = use_location();
    let target = location
        .map(|location| (location.path().to_string(), location.hash().to_string()))
        .unwrap_or_default();

    use_effect_with_deps(
        |(_, hash): &(String, String)| {
            scroll_for_location(&BrowserDom::new(), hash);
            || ()
        },
        target,
    );

    html! {}
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let dom = use_dom();
    let is_scrolled = use_state(|| false);

    {
        let dom = dom.clone();
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(
            move |_| {
                let env = dom.env();
                let listener = dom.add_scroll_listener(Rc::new(move || {
                    is_scrolled.set(env.scroll_y() > 600.0);
                }));
                move || {
                    if let Some(id) = listener {
                        dom.remove_scroll_listener(id);
                    }
                }
            },
            (),
        );
    }

    let scroll_to = |selector: &'static str| {
        let dom = dom.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            dom.scroll_to_element(selector, ScrollOptions::default());
        })
    };

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"quietline"}
                </Link<Route>>
                <div class="nav-right">
                    <a href="#video" class="nav-link" onclick={scroll_to("#video")}>{"Video"}</a>
                    <a href="#signup" class="nav-login-button" onclick={scroll_to("#signup")}>{"Call me"}</a>
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <ScrollOnNavigate />
            <Nav />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::get_log_level()).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
