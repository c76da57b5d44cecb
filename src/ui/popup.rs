/// Popup UI for Page Companion

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use log::{error, info, warn};
use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::platform::time::sleep;
use yew::prelude::*;

use crate::chrome::{ChromeRuntime, ChromeScripting, ChromeStorage, ChromeTabs};
use crate::config::ExtensionConfig;
use crate::debounce::Debounce;
use crate::error::{ExtensionError, Result};
use crate::messages::Stats;
use crate::popup::{is_save_shortcut, Notice, PopupController, PopupView, SettingsForm};
use crate::ui::components::{StatCard, ToggleRow};

type Controller = PopupController<ChromeStorage, ChromeTabs, ChromeScripting, ChromeRuntime>;
type NoteDebounce = Rc<RefCell<Debounce<()>>>;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    #[prop_or_default]
    pub config: ExtensionConfig,
}

/// Handles to the form controls the settings are read back from
#[derive(Clone)]
struct FormRefs {
    auto_save: NodeRef,
    notifications: NodeRef,
    analytics: NodeRef,
    quick_note: NodeRef,
}

impl FormRefs {
    fn read(&self) -> Result<SettingsForm> {
        Ok(SettingsForm {
            auto_save: read_checkbox(&self.auto_save, "autoSave")?,
            notifications: read_checkbox(&self.notifications, "notifications")?,
            analytics: read_checkbox(&self.analytics, "analytics")?,
            quick_note: self
                .quick_note
                .cast::<HtmlTextAreaElement>()
                .ok_or_else(|| ExtensionError::ElementMissing("quickNote".to_string()))?
                .value(),
        })
    }
}

fn read_checkbox(node: &NodeRef, id: &str) -> Result<bool> {
    node.cast::<HtmlInputElement>()
        .map(|input| input.checked())
        .ok_or_else(|| ExtensionError::ElementMissing(id.to_string()))
}

/// Blocking acknowledgment
fn notify(notice: &Notice) {
    if notice.is_error {
        warn!("{}", notice.message);
    } else {
        info!("{}", notice.message);
    }
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&notice.to_string());
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Run an action and show its outcome
fn spawn_notice<F>(action: F, fallback: &'static str)
where
    F: Future<Output = Result<Notice>> + 'static,
{
    spawn_local(async move {
        match action.await {
            Ok(notice) => notify(&notice),
            Err(e) => {
                error!("{}: {}", fallback, e);
                notify(&Notice::from_error(&e, fallback));
            }
        }
    });
}

fn save_note(controller: Rc<Controller>, refs: &FormRefs, debounce: &NoteDebounce) {
    let form = match refs.read() {
        Ok(form) => form,
        Err(e) => {
            error!("Error reading form: {}", e);
            notify(&Notice::from_error(&e, "Error saving settings"));
            return;
        }
    };
    debounce.borrow_mut().cancel();
    spawn_notice(async move { controller.save_note(form).await }, "Error saving settings");
}

fn toggle_dark_mode() {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body());
    if let Some(body) = body {
        let _ = body.class_list().toggle("dark");
    }
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let controller: Rc<Controller> = use_memo(props.config.clone(), |config| {
        PopupController::new(
            ChromeStorage::sync(),
            ChromeTabs,
            ChromeScripting,
            ChromeRuntime,
            config.clone(),
        )
    });
    let form = use_state(SettingsForm::default);
    let stats = use_state(Stats::default);
    let loading = use_state(|| true);
    let url_error = use_state(|| None::<String>);
    let note_debounce: NoteDebounce = use_mut_ref(Debounce::new);

    let refs = FormRefs {
        auto_save: use_node_ref(),
        notifications: use_node_ref(),
        analytics: use_node_ref(),
        quick_note: use_node_ref(),
    };
    let url_ref = use_node_ref();

    // Load settings and count the view on open
    {
        let controller = controller.clone();
        let form = form.clone();
        let stats = stats.clone();
        let loading = loading.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match controller.open().await {
                    Ok((PopupView { form: loaded, stats: counted }, failed)) => {
                        form.set(loaded);
                        stats.set(counted);
                        if let Some(e) = failed {
                            error!("Error updating statistics: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("Error loading settings: {}", e);
                        notify(&Notice::from_error(&e, "Error loading settings"));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    // Ctrl/Cmd+S saves the note
    {
        let controller = controller.clone();
        let refs = refs.clone();
        let note_debounce = note_debounce.clone();

        use_effect_with((), move |_| {
            let document = web_sys::window().and_then(|w| w.document());
            let listener = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                if is_save_shortcut(&e.key(), e.ctrl_key(), e.meta_key()) {
                    e.prevent_default();
                    save_note(controller.clone(), &refs, &note_debounce);
                }
            }) as Box<dyn Fn(KeyboardEvent)>);

            if let Some(document) = &document {
                if let Err(e) = document.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref()) {
                    warn!("Could not attach save shortcut: {:?}", e);
                }
            }

            move || {
                if let Some(document) = document {
                    let _ = document.remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
                }
            }
        });
    }

    // Toggle handler: persist the whole form
    let on_toggle = {
        let controller = controller.clone();
        let refs = refs.clone();
        let form = form.clone();
        let note_debounce = note_debounce.clone();

        Callback::from(move |_: Event| {
            let current = match refs.read() {
                Ok(current) => current,
                Err(e) => {
                    error!("Error reading form: {}", e);
                    notify(&Notice::from_error(&e, "Error saving settings"));
                    return;
                }
            };
            form.set(current.clone());
            // The note is part of this save
            note_debounce.borrow_mut().cancel();

            let controller = controller.clone();
            spawn_notice(async move { controller.save_settings(current).await }, "Error saving settings");
        })
    };

    // Quick note: save once typing pauses
    let on_note_input = {
        let controller = controller.clone();
        let refs = refs.clone();
        let form = form.clone();
        let note_debounce = note_debounce.clone();
        let delay = Duration::from_millis(u64::from(controller.config().note_debounce_ms));

        Callback::from(move |_: InputEvent| {
            let current = match refs.read() {
                Ok(current) => current,
                Err(e) => {
                    error!("Error reading form: {}", e);
                    return;
                }
            };
            form.set(current);
            let ticket = note_debounce.borrow_mut().push(());

            let controller = controller.clone();
            let refs = refs.clone();
            let note_debounce = note_debounce.clone();
            spawn_local(async move {
                sleep(delay).await;
                let due = note_debounce.borrow_mut().take(ticket);
                if due.is_none() {
                    return;
                }
                // Read the form now so later toggles are not overwritten
                match refs.read() {
                    Ok(latest) => {
                        if let Err(e) = controller.save_settings(latest).await {
                            error!("Error saving note: {}", e);
                            notify(&Notice::from_error(&e, "Error saving settings"));
                        }
                    }
                    Err(e) => error!("Error reading form: {}", e),
                }
            });
        })
    };

    let on_save_note = {
        let controller = controller.clone();
        let refs = refs.clone();
        let note_debounce = note_debounce.clone();

        Callback::from(move |_: MouseEvent| {
            save_note(controller.clone(), &refs, &note_debounce);
        })
    };

    let on_capture = {
        let controller = controller.clone();

        Callback::from(move |_: MouseEvent| {
            let controller = controller.clone();
            spawn_notice(async move { controller.capture_page().await }, "Error capturing page");
        })
    };

    let on_clear = {
        let controller = controller.clone();
        let form = form.clone();
        let stats = stats.clone();
        let note_debounce = note_debounce.clone();

        Callback::from(move |_: MouseEvent| {
            if !confirm("Clear all data?") {
                return;
            }
            note_debounce.borrow_mut().cancel();

            let controller = controller.clone();
            let form = form.clone();
            let stats = stats.clone();
            spawn_local(async move {
                match controller.clear_data().await {
                    Ok(reloaded) => {
                        form.set(reloaded.form);
                        stats.set(reloaded.stats);
                    }
                    Err(e) => {
                        error!("Error clearing data: {}", e);
                        notify(&Notice::from_error(&e, "Error clearing data"));
                    }
                }
            });
        })
    };

    let on_refresh = {
        let controller = controller.clone();
        let stats = stats.clone();

        Callback::from(move |_: MouseEvent| {
            let controller = controller.clone();
            let stats = stats.clone();
            spawn_local(async move {
                match controller.refresh().await {
                    Ok((counted, notice)) => {
                        stats.set(counted);
                        notify(&notice);
                    }
                    Err(e) => {
                        error!("Error refreshing: {}", e);
                        notify(&Notice::from_error(&e, "Error refreshing data"));
                    }
                }
            });
        })
    };

    let process_url = {
        let controller = controller.clone();
        let url_ref = url_ref.clone();
        let url_error = url_error.clone();

        Callback::from(move |_: ()| {
            let input = url_ref
                .cast::<HtmlInputElement>()
                .map(|i| i.value())
                .unwrap_or_default();

            let controller = controller.clone();
            let url_error = url_error.clone();
            spawn_local(async move {
                match controller.process_url(&input).await {
                    Ok(()) => url_error.set(None),
                    Err(e) => {
                        warn!("Rejected URL {:?}: {}", input, e);
                        url_error.set(Some(Notice::from_error(&e, "Could not open URL").message));
                    }
                }
            });
        })
    };

    let on_process_url = {
        let process_url = process_url.clone();
        Callback::from(move |_: MouseEvent| process_url.emit(()))
    };

    let on_url_keypress = {
        let process_url = process_url.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                process_url.emit(());
            }
        })
    };

    let on_settings = {
        let controller = controller.clone();

        Callback::from(move |_: MouseEvent| {
            let controller = controller.clone();
            spawn_local(async move {
                if let Err(e) = controller.open_settings().await {
                    error!("Error opening settings: {}", e);
                    notify(&Notice::from_error(&e, "Could not open settings"));
                }
            });
        })
    };

    let on_help = {
        let controller = controller.clone();

        Callback::from(move |_: MouseEvent| {
            let controller = controller.clone();
            spawn_local(async move {
                if let Err(e) = controller.open_help().await {
                    error!("Error opening help: {}", e);
                    notify(&Notice::from_error(&e, "Could not open help"));
                }
            });
        })
    };

    let on_dark_mode = Callback::from(|_: MouseEvent| toggle_dark_mode());

    html! {
        <div class="padding-20">
            <div class="header" style="display: flex; justify-content: space-between; align-items: center;">
                <h1 class="popup-title">{"Page Companion"}</h1>
                <div style="display: flex; gap: 4px;">
                    <Button onclick={on_dark_mode} variant={ButtonVariant::Plain}>{"🌓"}</Button>
                    <Button onclick={on_settings} variant={ButtonVariant::Plain}>{"⚙️"}</Button>
                    <Button onclick={on_help} variant={ButtonVariant::Plain}>{"❓"}</Button>
                </div>
            </div>

            if *loading {
                <div class="loading-text-center">
                    <Spinner />
                </div>
            }

            <div class="stats-container" style="display: flex; gap: 8px; margin: 10px 0;">
                <StatCard label="Page views" value={stats.page_views.to_string()} />
                <StatCard label="Time saved" value={format!("{}h", stats.time_saved)} />
            </div>

            <div class="flex-column-gap">
                <Button onclick={on_capture} variant={ButtonVariant::Primary} block={true}>
                    {"📸 Capture Page"}
                </Button>
                <Button onclick={on_refresh} variant={ButtonVariant::Secondary} block={true}>
                    {"🔄 Refresh"}
                </Button>
            </div>

            <div class="settings-section">
                <ToggleRow id="autoSave" label="Auto save" checked={form.auto_save}
                    node_ref={refs.auto_save.clone()} onchange={on_toggle.clone()} />
                <ToggleRow id="notifications" label="Notifications" checked={form.notifications}
                    node_ref={refs.notifications.clone()} onchange={on_toggle.clone()} />
                <ToggleRow id="analytics" label="Analytics" checked={form.analytics}
                    node_ref={refs.analytics.clone()} onchange={on_toggle} />
            </div>

            <div class="note-section">
                <textarea
                    id="quickNote"
                    class="quick-note"
                    placeholder="Quick note..."
                    ref={refs.quick_note.clone()}
                    value={form.quick_note.clone()}
                    oninput={on_note_input}
                />
                <Button onclick={on_save_note} variant={ButtonVariant::Secondary} block={true}>
                    {"💾 Save Note"}
                </Button>
            </div>

            <div class="url-section">
                <input
                    type="text"
                    id="customURL"
                    class="search-input"
                    placeholder="https://..."
                    ref={url_ref}
                    onkeypress={on_url_keypress}
                />
                <Button onclick={on_process_url} variant={ButtonVariant::Secondary} block={true}>
                    {"🔗 Open URL"}
                </Button>
                if let Some(err) = (*url_error).clone() {
                    <Alert r#type={AlertType::Danger} title={err} inline={true}>
                    </Alert>
                }
            </div>

            <Button onclick={on_clear} variant={ButtonVariant::Danger} block={true}>
                {"🗑️ Clear Data"}
            </Button>

            <p class="footer-popup">
                {"Page Companion v0.1.0"}
            </p>
        </div>
    }
}
