//! Top navigation with the session-dependent links and sign-out.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::profile::ProfileStore;
use crate::state::session::{SessionState, SessionStore};
use crate::state::todos::TodoStore;
use crate::util::auth::{HOME_PATH, LOGIN_PATH, PROFILE_PATH, REGISTER_PATH, TODOS_PATH};

#[component]
pub fn NavBar() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let todos = expect_context::<TodoStore>();
    let profile = expect_context::<ProfileStore>();
    let state = expect_context::<RwSignal<SessionState>>();

    // The route guard takes the user off protected pages once the session
    // is cleared.
    let on_logout = move |_| {
        let (session, todos, profile) = (session.clone(), todos.clone(), profile.clone());
        leptos::task::spawn_local(async move {
            session.logout().await;
            todos.clear();
            profile.clear();
        });
    };

    let user_label = move || {
        state
            .get()
            .current_user
            .map(|u| u.display_name().to_owned())
            .unwrap_or_default()
    };

    view! {
        <nav class="nav-bar">
            <A href=HOME_PATH>"Home"</A>
            <Show
                when=move || state.get().is_logged_in()
                fallback=|| view! {
                    <span class="nav-bar__links">
                        <A href=LOGIN_PATH>"Sign in"</A>
                        <A href=REGISTER_PATH>"Register"</A>
                    </span>
                }
            >
                <span class="nav-bar__links">
                    <A href=TODOS_PATH>"Todos"</A>
                    <A href=PROFILE_PATH>"Profile"</A>
                </span>
                <span class="nav-bar__user">{user_label}</span>
                <button class="nav-bar__logout" on:click=on_logout.clone()>"Sign out"</button>
            </Show>
        </nav>
    }
}
