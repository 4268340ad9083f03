//! Todo list page: load, add, toggle and delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected route. The list is fetched once per mount; every mutation goes
//! through [`TodoStore`], which patches the list in place.

use leptos::prelude::*;

use crate::net::types::{Todo, TodoCreate};
use crate::state::todos::{TodoStore, TodosState};

#[component]
pub fn TodosPage() -> impl IntoView {
    let store = expect_context::<TodoStore>();
    let state = expect_context::<RwSignal<TodosState>>();
    let new_title = RwSignal::new(String::new());

    // Effects only run in the browser, so SSR never fetches.
    let loader = store.clone();
    Effect::new(move || {
        let loader = loader.clone();
        leptos::task::spawn_local(async move {
            loader.fetch_todos().await;
        });
    });

    let creator = store.clone();
    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if state.get_untracked().saving {
            return;
        }
        let data = TodoCreate { title: new_title.get_untracked().trim().to_owned(), ..TodoCreate::default() };
        let creator = creator.clone();
        leptos::task::spawn_local(async move {
            if creator.create_todo(&data).await.is_some() {
                new_title.set(String::new());
            }
        });
    };

    let summary = move || {
        let s = state.get();
        format!("{} of {} remaining", s.remaining(), s.items.len())
    };

    view! {
        <section class="todos-page">
            <h1>"My todos"</h1>
            <form class="todos-page__add" on:submit=on_add>
                <input
                    class="todos-page__input"
                    type="text"
                    placeholder="What needs doing?"
                    prop:value=move || new_title.get()
                    on:input=move |ev| new_title.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || state.get().saving>"Add"</button>
            </form>
            <Show when=move || state.get().error.is_some()>
                <p class="todos-page__error">{move || state.get().error.unwrap_or_default()}</p>
            </Show>
            <Show
                when=move || !state.get().loading
                fallback=|| view! { <p class="todos-page__loading">"Loading..."</p> }
            >
                <p class="todos-page__summary">{summary}</p>
                <ul class="todo-list">
                    <For
                        each=move || state.get().items
                        key=|todo| (todo.id, todo.completed, todo.title.clone())
                        children={
                            let store = store.clone();
                            move |todo| view! { <TodoRow todo=todo store=store.clone()/> }
                        }
                    />
                </ul>
            </Show>
        </section>
    }
}

#[component]
fn TodoRow(todo: Todo, store: TodoStore) -> impl IntoView {
    let id = todo.id;
    let toggler = store.clone();
    let on_toggle = move |_| {
        let toggler = toggler.clone();
        leptos::task::spawn_local(async move {
            toggler.toggle_completed(id).await;
        });
    };
    let on_delete = move |_| {
        let store = store.clone();
        leptos::task::spawn_local(async move {
            store.delete_todo(id).await;
        });
    };
    let class = if todo.completed { "todo-row todo-row--done" } else { "todo-row" };

    view! {
        <li class=class>
            <input type="checkbox" prop:checked=todo.completed on:change=on_toggle/>
            <span class="todo-row__title">{todo.title}</span>
            {todo.description.map(|d| view! { <span class="todo-row__description">{d}</span> })}
            <button class="todo-row__delete" on:click=on_delete>"Delete"</button>
        </li>
    }
}
