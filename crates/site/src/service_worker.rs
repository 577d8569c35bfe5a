//! Service-worker event wiring. Compiled for `wasm32` only.

use std::rc::Rc;

use leptos::logging;
use offline_cache::CacheManager;
use platform_host::AssetResponse;
use platform_host_web::{
    asset_fetcher, cache_storage, capture_response, AssetFetcherAdapter, CacheStorageAdapter,
};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{ExtendableEvent, FetchEvent, ServiceWorkerGlobalScope};

use crate::{intercepted_request, worker_cache_config};

type WorkerCacheManager = CacheManager<CacheStorageAdapter, AssetFetcherAdapter>;

/// Registers `install`, `activate` and `fetch` listeners on the worker global scope.
///
/// # Errors
///
/// Fails when called outside a service worker or when a listener cannot be attached.
#[wasm_bindgen]
pub fn start_service_worker() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let scope = js_sys::global()
        .dyn_into::<ServiceWorkerGlobalScope>()
        .map_err(|_| JsValue::from_str("start_service_worker must run in a service worker"))?;
    let origin = scope.location().origin();
    let manager: Rc<WorkerCacheManager> = Rc::new(CacheManager::new(
        worker_cache_config(&origin),
        cache_storage(),
        asset_fetcher(),
    ));
    logging::log!(
        "offline cache worker starting with generation `{}`",
        manager.cache_name()
    );

    let install_scope = scope.clone();
    let install_manager = Rc::clone(&manager);
    let on_install = Closure::<dyn FnMut(ExtendableEvent)>::wrap(Box::new(move |event| {
        let scope = install_scope.clone();
        let manager = Rc::clone(&install_manager);
        let work = future_to_promise(async move {
            let outcome = manager
                .install()
                .await
                .map_err(|err| JsValue::from_str(&err.to_string()))?;
            logging::log!(
                "offline cache installed {} assets into `{}`",
                outcome.cached_assets,
                outcome.cache_name
            );
            if outcome.skip_waiting {
                JsFuture::from(scope.skip_waiting()?).await?;
            }
            Ok(JsValue::UNDEFINED)
        });
        if let Err(err) = event.wait_until(&work) {
            logging::warn!("install waitUntil failed: {err:?}");
        }
    }));

    let activate_scope = scope.clone();
    let activate_manager = Rc::clone(&manager);
    let on_activate = Closure::<dyn FnMut(ExtendableEvent)>::wrap(Box::new(move |event| {
        let scope = activate_scope.clone();
        let manager = Rc::clone(&activate_manager);
        let work = future_to_promise(async move {
            let outcome = manager
                .activate()
                .await
                .map_err(|err| JsValue::from_str(&err.to_string()))?;
            if outcome.claim_clients {
                JsFuture::from(scope.clients().claim()).await?;
            }
            Ok(JsValue::UNDEFINED)
        });
        if let Err(err) = event.wait_until(&work) {
            logging::warn!("activate waitUntil failed: {err:?}");
        }
    }));

    let fetch_scope = scope.clone();
    let fetch_manager = Rc::clone(&manager);
    let on_fetch = Closure::<dyn FnMut(FetchEvent)>::wrap(Box::new(move |event| {
        let browser_request = event.request();
        let Some(request) = intercepted_request(&browser_request.method(), &browser_request.url())
        else {
            return;
        };
        let scope = fetch_scope.clone();
        let manager = Rc::clone(&fetch_manager);
        let answer = future_to_promise(async move {
            if let Some(cached) = manager.lookup(&request).await {
                return to_browser_response(&cached).map(JsValue::from);
            }

            // The page's own request keeps its mode, credentials and headers.
            let response: web_sys::Response =
                JsFuture::from(scope.fetch_with_request(&browser_request))
                    .await?
                    .dyn_into()?;
            if response.type_() == web_sys::ResponseType::Basic && response.status() == 200 {
                let copy = response.clone()?;
                spawn_local(async move {
                    match capture_response(&copy).await {
                        Ok(captured) => {
                            manager.write_through(&request, &captured).await;
                        }
                        Err(err) => {
                            logging::warn!("offline cache could not read `{}`: {err}", request.url);
                        }
                    }
                });
            }
            Ok(response.into())
        });
        if let Err(err) = event.respond_with(&answer) {
            logging::warn!("respondWith failed: {err:?}");
        }
    }));

    scope.add_event_listener_with_callback("install", on_install.as_ref().unchecked_ref())?;
    scope.add_event_listener_with_callback("activate", on_activate.as_ref().unchecked_ref())?;
    scope.add_event_listener_with_callback("fetch", on_fetch.as_ref().unchecked_ref())?;
    on_install.forget();
    on_activate.forget();
    on_fetch.forget();
    Ok(())
}

const NULL_BODY_STATUSES: [u16; 4] = [101, 204, 205, 304];

fn to_browser_response(response: &AssetResponse) -> Result<web_sys::Response, JsValue> {
    // Only cached entries are rebuilt; script cannot construct a status outside 200..=599.
    if !(200..=599).contains(&response.status) {
        return Ok(web_sys::Response::error());
    }

    let headers = web_sys::Headers::new()?;
    for (name, value) in &response.headers {
        headers.append(name, value)?;
    }
    let init = web_sys::ResponseInit::new();
    init.set_status(response.status);
    init.set_status_text(&response.status_text);
    init.set_headers(&headers);

    if NULL_BODY_STATUSES.contains(&response.status) {
        return web_sys::Response::new_with_opt_buffer_source_and_init(None, &init);
    }
    let body: js_sys::Object = js_sys::Uint8Array::from(response.body.as_slice()).into();
    web_sys::Response::new_with_opt_buffer_source_and_init(Some(&body), &init)
}
