//! 写真アップロード画面

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileList, FileReader, HtmlInputElement};

use crate::api::gemini::build_time_api_key;
use crate::app::Controller;
use culina_common::ImageData;

#[component]
pub fn UploadView<F>(
    controller: Controller,
    api_key: ReadSignal<String>,
    set_api_key: WriteSignal<String>,
    on_image: F,
) -> impl IntoView
where
    F: Fn(ImageData) + Clone + 'static,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let (preview_url, set_preview_url) = signal(None::<String>);
    let is_analyzing = move || controller.with(|c| c.is_analyzing());
    let error = move || controller.with(|c| c.error().map(String::from));
    let is_enabled = move || !is_analyzing() && !api_key.get().trim().is_empty();

    let handle_files = move |files: FileList| {
        // 1枚のみ、画像以外は無視
        if let Some(file) = files.get(0).filter(|f| f.type_().starts_with("image/")) {
            let on_image = on_image.clone();
            read_file(file, move |data_url| {
                match ImageData::from_data_url(&data_url) {
                    Ok(image) => {
                        set_preview_url.set(Some(data_url));
                        on_image(image);
                    }
                    Err(e) => gloo::console::error!(format!("unreadable image: {}", e)),
                }
            });
        }
    };

    let on_drop = {
        let handle_files = handle_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);
            if !is_enabled() {
                return;
            }
            if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
                handle_files(files);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if is_enabled() {
            set_is_dragover.set(true);
        }
    };

    let on_click = move |_| {
        if !is_enabled() {
            return;
        }
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = document
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        input.set_type("file");
        input.set_accept("image/*");

        let handle_files = handle_files.clone();
        let picker = input.clone();
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(files) = picker.files() {
                handle_files(files);
            }
        }) as Box<dyn FnMut(_)>);

        input.set_onchange(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
        input.click();
    };

    view! {
        <div class="upload-view">
            <h2>"What's in your fridge?"</h2>
            <p class="text-muted">
                "Take a photo or upload an image to get AI-powered recipe suggestions."
            </p>

            <Show when=move || build_time_api_key().is_none()>
                <div class="form-group">
                    <label for="api-key">"Gemini API Key"</label>
                    <input
                        type="password"
                        id="api-key"
                        placeholder="Enter your API key..."
                        prop:value=move || api_key.get()
                        on:input=move |ev| set_api_key.set(event_target_value(&ev))
                    />
                    <a
                        href="https://aistudio.google.com/app/apikey"
                        target="_blank"
                        rel="noopener noreferrer"
                        class="api-key-link"
                    >
                        "Get an API key →"
                    </a>
                </div>
            </Show>

            <div
                class=move || {
                    let mut classes = vec!["upload-area"];
                    if is_dragover.get() {
                        classes.push("dragover");
                    }
                    if !is_enabled() {
                        classes.push("disabled");
                    }
                    classes.join(" ")
                }
                on:drop=on_drop
                on:dragover=on_dragover
                on:dragleave=move |_: DragEvent| set_is_dragover.set(false)
                on:click=on_click
            >
                {move || {
                    if is_analyzing() {
                        view! {
                            <div class="spinner"></div>
                            <p>"Analyzing ingredients..."</p>
                            <p class="text-muted">"This usually takes a few seconds."</p>
                        }
                            .into_any()
                    } else if let Some(url) = preview_url.get() {
                        view! {
                            <img class="preview" src=url alt="Preview" />
                            <p class="text-muted">"Click to retake"</p>
                        }
                            .into_any()
                    } else {
                        view! {
                            <div class="upload-icon">"📷"</div>
                            <p>"Click or drop image here"</p>
                            <p class="text-muted">"Supports JPG, PNG"</p>
                        }
                            .into_any()
                    }
                }}
            </div>

            {move || error().map(|message| view! { <div class="error-banner">{message}</div> })}
        </div>
    }
}

fn read_file<F>(file: File, on_loaded: F)
where
    F: Fn(String) + 'static,
{
    let Ok(reader) = FileReader::new() else {
        return;
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) {
            on_loaded(data_url);
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    let _ = reader.read_as_data_url(&file);
}
