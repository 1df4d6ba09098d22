//! CRUD Sync Frontend App
//!
//! Shell: greeting, sign-out, navigation and one route per collection.

use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use reactive_stores::Store;

use crate::config::AppConfig;
use crate::pages::{ProductsPage, TodosPage, UsersPage};
use crate::store::{store_sign_out, store_username, use_shell_store, ShellState, ShellStateStoreFields};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let store = Store::new(ShellState::new(config));
    provide_context(store);

    view! {
        <Router>
            <Show
                when=move || store.session().read().is_some()
                fallback=|| view! { <SignedOut /> }
            >
                <Shell />
            </Show>
        </Router>
    }
}

#[component]
fn Shell() -> impl IntoView {
    let store = use_shell_store();

    view! {
        <div class="container">
            <h1>"Hello " {move || store_username(&store)}</h1>
            <button class="sign-out" on:click=move |_| store_sign_out(&store)>"Sign out"</button>

            <nav>
                <ul class="nav-links">
                    <li><A href="/">"Home"</A></li>
                    <li><A href="/users">"Users"</A></li>
                    <li><A href="/products">"Products"</A></li>
                </ul>
            </nav>

            <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                <Route path=path!("/") view=TodosPage />
                <Route path=path!("/users") view=UsersPage />
                <Route path=path!("/products") view=ProductsPage />
            </Routes>
        </div>
    }
}

/// Shown when the identity provider has not left a session
#[component]
fn SignedOut() -> impl IntoView {
    let store = use_shell_store();
    let sign_in_url = store.config().read().auth.sign_in_url.clone();

    view! {
        <div class="container signed-out">
            <h1>"You are not signed in"</h1>
            <a href=sign_in_url>"Sign in"</a>
        </div>
    }
}

/// Rendered instead of the app when the configuration is unusable
#[component]
pub fn ConfigError(message: String) -> impl IntoView {
    view! {
        <div class="container fatal">
            <h1>"Configuration error"</h1>
            <p>{message}</p>
        </div>
    }
}
