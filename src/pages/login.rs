//! Sign-in page.
//!
//! On success the route guard moves the user on (to the `redirect` target or
//! home), so the page only submits and shows the session's error.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::net::types::LoginCredentials;
use crate::state::session::{SessionState, SessionStore};
use crate::util::auth::REGISTER_PATH;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let state = expect_context::<RwSignal<SessionState>>();
    let identifier = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if state.get_untracked().is_loading {
            return;
        }
        let credentials = LoginCredentials {
            identifier: identifier.get_untracked().trim().to_owned(),
            password: password.get_untracked(),
        };
        let session = session.clone();
        leptos::task::spawn_local(async move {
            if session.login(&credentials).await {
                password.set(String::new());
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Email or username"
                        prop:value=move || identifier.get()
                        on:input=move |ev| identifier.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || state.get().is_loading>
                        {move || if state.get().is_loading { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || state.get().last_error.is_some()>
                    <p class="auth-message auth-message--error">
                        {move || state.get().last_error.unwrap_or_default()}
                    </p>
                </Show>
                <p class="auth-card__footer">
                    "No account yet? "
                    <A href=REGISTER_PATH>"Create one"</A>
                </p>
            </div>
        </div>
    }
}
