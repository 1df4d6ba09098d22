//! Notice Banner Component
//!
//! Shows the collection's last failure until dismissed or timed out.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use remote_collection::{CollectionState, Record};

#[component]
pub fn NoticeBanner<R: Record>(
    state: RwSignal<CollectionState<R>>,
    /// 0 disables auto-dismiss
    timeout_ms: u32,
) -> impl IntoView {
    let serial = Memo::new(move |_| state.with(|s| s.last_error().map(|n| n.serial)));

    Effect::new(move |_| {
        let Some(serial) = serial.get() else { return };
        if timeout_ms == 0 {
            return;
        }
        spawn_local(async move {
            TimeoutFuture::new(timeout_ms).await;
            state.try_update(|s| s.dismiss_error_if(serial));
        });
    });

    move || {
        state.with(|s| s.last_error().cloned()).map(|notice| {
            view! {
                <div class=format!("notice notice-{}", notice.error.kind()) role="alert">
                    <span>{format!("Could not {}: {}", notice.action, notice.error)}</span>
                    <button on:click=move |_| state.update(|s| s.dismiss_error())>"×"</button>
                </div>
            }
        })
    }
}
