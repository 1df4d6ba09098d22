//! Collection View Component
//!
//! One generic view per remote collection: fetch on mount, optimistic
//! create/update/delete, failure banner. All list logic lives in
//! `CollectionState`; this component only wires events to the sync drivers.

use leptos::prelude::*;
use leptos::task::spawn_local;
use remote_collection::{sync, CollectionState, Phase, Record, RemoteCollection, StateCell};

use crate::components::{CreateForm, EditModal, NoticeBanner, RecordTable};
use crate::store::{use_shell_store, ShellStateStoreFields};

/// Collection state held in a signal owned by the view
struct SignalCell<R: Record>(RwSignal<CollectionState<R>>);

impl<R: Record> Clone for SignalCell<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Record> Copy for SignalCell<R> {}

impl<R: Record> StateCell<R> for SignalCell<R> {
    fn with_state<T>(&self, f: impl FnOnce(&mut CollectionState<R>) -> T) -> Option<T> {
        // Disposed after unmount; late responses land nowhere
        self.0.try_update(f)
    }
}

#[component]
pub fn CollectionView<C>(title: &'static str, client: C) -> impl IntoView
where
    C: RemoteCollection + Clone + 'static,
{
    let shell = use_shell_store();
    let notice_timeout_ms = shell.config().read().notice_timeout_ms;
    let label = <C::Record as Record>::LABEL;

    let state = RwSignal::new(CollectionState::<C::Record>::new());
    let cell = SignalCell(state);
    let client = StoredValue::new_local(client);
    let (form_error, set_form_error) = signal::<Option<String>>(None);

    let load = move || {
        spawn_local(async move {
            if let Some(client) = client.try_get_value() {
                sync::load(&client, &cell).await;
            }
        });
    };

    // Fetch on mount; responses after unmount are ignored
    load();
    on_cleanup(move || {
        state.try_update(|s| s.cancel());
    });

    let on_create = Callback::new(move |()| {
        spawn_local(async move {
            let Some(client) = client.try_get_value() else { return };
            let message = sync::create(&client, &cell).await.err().map(|e| e.to_string());
            set_form_error.try_set(message);
        });
    });

    let on_edit = Callback::new(move |id: String| {
        state.update(|s| {
            if !s.open_edit(&id) {
                tracing::warn!(id = %id, "record vanished before edit");
            }
        });
    });

    let on_save = Callback::new(move |()| {
        spawn_local(async move {
            if let Some(client) = client.try_get_value() {
                sync::update(&client, &cell).await;
            }
        });
    });

    let on_delete = Callback::new(move |id: String| {
        spawn_local(async move {
            if let Some(client) = client.try_get_value() {
                sync::delete(&client, &cell, &id).await;
            }
        });
    });

    let loading = move || state.with(|s| s.phase() == Phase::Loading);

    view! {
        <section class="collection">
            <header class="collection-header">
                <h2>{title}</h2>
                <button on:click=move |_| {
                    set_form_error.set(None);
                    state.update(|s| s.toggle_form());
                }>
                    {format!("Add {}", label)}
                </button>
                <button on:click=move |_| load() disabled=loading>"Reload"</button>
            </header>

            <NoticeBanner state=state timeout_ms=notice_timeout_ms />

            <Show when=move || state.with(|s| s.form_visible())>
                <CreateForm state=state error=form_error on_submit=on_create />
            </Show>

            <Show when=move || loading() && state.with(|s| s.is_empty())>
                <p class="loading">"Loading…"</p>
            </Show>

            <RecordTable state=state on_edit=on_edit on_delete=on_delete />

            <EditModal state=state on_save=on_save />
        </section>
    }
}
