//! Public landing page.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::session::SessionState;
use crate::util::auth::{LOGIN_PATH, REGISTER_PATH, TODOS_PATH};

#[component]
pub fn HomePage() -> impl IntoView {
    let state = expect_context::<RwSignal<SessionState>>();

    let greeting = move || {
        state
            .get()
            .current_user
            .map(|u| format!("Welcome back, {}.", u.display_name()))
            .unwrap_or_else(|| "Keep track of what needs doing.".to_owned())
    };

    view! {
        <section class="home-page">
            <h1>"Todos"</h1>
            <p class="home-page__greeting">{greeting}</p>
            <Show
                when=move || state.get().is_logged_in()
                fallback=|| view! {
                    <div class="home-page__actions">
                        <A href=LOGIN_PATH>"Sign in"</A>
                        <A href=REGISTER_PATH>"Create account"</A>
                    </div>
                }
            >
                <div class="home-page__actions">
                    <A href=TODOS_PATH>"Open my todos"</A>
                </div>
            </Show>
        </section>
    }
}
