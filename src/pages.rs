//! Route Pages
//!
//! Each page instantiates the generic collection view for one record type.

use leptos::prelude::*;
use remote_collection::{Product, RemoteCollection, SyncResult, User};

use crate::components::CollectionView;
use crate::store::{store_bearer_token, use_shell_store, ShellStateStoreFields};

#[component]
pub fn TodosPage() -> impl IntoView {
    let store = use_shell_store();
    let token = store_bearer_token(&store);
    let client = store.config().read().todos_client(token);
    mount("Amplify Todos", client)
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let store = use_shell_store();
    let token = store_bearer_token(&store);
    let client = store.config().read().rest_client::<User>(token);
    mount("Users", client)
}

#[component]
pub fn ProductsPage() -> impl IntoView {
    let store = use_shell_store();
    let token = store_bearer_token(&store);
    let client = store.config().read().rest_client::<Product>(token);
    mount("Products", client)
}

fn mount<C>(title: &'static str, client: SyncResult<C>) -> AnyView
where
    C: RemoteCollection + Clone + 'static,
{
    match client {
        Ok(client) => view! { <CollectionView title=title client=client /> }.into_any(),
        Err(e) => {
            tracing::error!(page = title, "cannot build client: {}", e);
            view! { <p class="notice notice-config">{e.to_string()}</p> }.into_any()
        }
    }
}
