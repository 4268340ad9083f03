//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app shell builds the single session, HTTP client and resource stores,
//! mirrors their state into signals for rendering, starts session hydration
//! and installs the route guard inside the router.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
    hooks::use_navigate,
};
use std::sync::Arc;

use crate::components::{nav_bar::NavBar, toast_stack::ToastStack};
use crate::config::ClientConfig;
use crate::net::transport::default_transport;
use crate::pages::{
    home::HomePage, login::LoginPage, profile::ProfilePage, register::RegisterPage, todos::TodosPage,
};
use crate::state::profile::{ProfileState, ProfileStore};
use crate::state::session::{SessionState, SessionStore};
use crate::state::todos::{TodoStore, TodosState};
use crate::state::ui::UiState;
use crate::util::auth::install_route_guard;
use crate::util::notify::ToastNotifier;
use crate::util::token_store::default_token_store;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the stores and their mirrored signals, then sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let ui = RwSignal::new(UiState::default());
    let config = ClientConfig::from_build_env();
    let tokens = default_token_store(&config.token_storage_key);
    let session = SessionStore::connect(config, default_transport(), tokens, Arc::new(ToastNotifier::new(ui)));
    let todos = TodoStore::new(session.client().clone());
    let profile = ProfileStore::new(session.client().clone());

    let session_state = RwSignal::new(session.snapshot());
    let todos_state = RwSignal::new(todos.snapshot());
    let profile_state = RwSignal::new(profile.snapshot());
    session.context().subscribe(move |s| session_state.set(s.clone()));
    todos.subscribe(move |s| todos_state.set(s.clone()));
    profile.subscribe(move |s| profile_state.set(s.clone()));

    #[cfg(feature = "hydrate")]
    {
        let session = session.clone();
        leptos::task::spawn_local(async move { session.initialize().await });
    }

    provide_context(ui);
    provide_context(session.clone());
    provide_context(todos);
    provide_context(profile);
    provide_context::<RwSignal<SessionState>>(session_state);
    provide_context::<RwSignal<TodosState>>(todos_state);
    provide_context::<RwSignal<ProfileState>>(profile_state);

    view! {
        <Stylesheet id="leptos" href="/pkg/todo-client.css"/>
        <Title text="Todos"/>

        <Router>
            <RouteGuard session=session state=session_state/>
            <NavBar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route path=StaticSegment("todos") view=TodosPage/>
                    <Route path=StaticSegment("profile") view=ProfilePage/>
                </Routes>
            </main>
            <ToastStack/>
        </Router>
    }
}

/// Installs the navigation guard; needs the router's location context.
#[component]
fn RouteGuard(session: SessionStore, state: RwSignal<SessionState>) -> impl IntoView {
    install_route_guard(session, state, use_navigate());
}
