use super::*;
use js_sys::{Promise, Uint8Array};
use platform_host::ResponseType;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = r#"
function fail(message) {
  throw new Error(message);
}

function requireCaches() {
  if (typeof caches === 'undefined') {
    fail('Cache API unavailable');
  }
  return caches;
}

async function readRecord(res, fromCache) {
  const headers = [];
  res.headers.forEach((value, name) => headers.push([name, value]));
  const buffer = await res.arrayBuffer();
  let type = res.type;
  if (fromCache && type === 'default') {
    type = 'basic';
  }
  return {
    status: res.status,
    status_text: res.statusText,
    response_type: type,
    headers,
    body: new Uint8Array(buffer),
  };
}

const NULL_BODY_STATUSES = [101, 204, 205, 304];

function toResponse(record) {
  const body = NULL_BODY_STATUSES.includes(record.status) ? null : record.body;
  return new Response(body, {
    status: record.status,
    statusText: record.status_text,
    headers: record.headers,
  });
}

export async function jsCacheMatch(cacheName, key) {
  const cache = await requireCaches().open(cacheName);
  const res = await cache.match(new Request(key, { method: 'GET' }));
  if (!res) return null;
  return await readRecord(res, true);
}

export async function jsCachePut(cacheName, key, record) {
  const cache = await requireCaches().open(cacheName);
  await cache.put(new Request(key, { method: 'GET' }), toResponse(record));
}

export async function jsCachePutAll(cacheName, keys, records) {
  const storage = requireCaches();
  const staging = `${cacheName}::staging`;
  await storage.delete(staging);
  const stage = await storage.open(staging);
  try {
    for (let i = 0; i < keys.length; i += 1) {
      await stage.put(new Request(keys[i], { method: 'GET' }), toResponse(records[i]));
    }
  } catch (err) {
    await storage.delete(staging);
    throw err;
  }
  const target = await storage.open(cacheName);
  for (let i = 0; i < keys.length; i += 1) {
    const res = await stage.match(new Request(keys[i], { method: 'GET' }));
    await target.put(new Request(keys[i], { method: 'GET' }), res);
  }
  await storage.delete(staging);
}

export async function jsCacheNames() {
  return await requireCaches().keys();
}

export async function jsCacheDelete(cacheName) {
  return await requireCaches().delete(cacheName);
}

export async function jsNetworkFetch(method, url) {
  const res = await fetch(new Request(url, { method }));
  return await readRecord(res, false);
}

export async function jsReadResponse(res) {
  return await readRecord(res, false);
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsCacheMatch)]
    fn js_cache_match(cache_name: &str, key: &str) -> Promise;
    #[wasm_bindgen(js_name = jsCachePut)]
    fn js_cache_put(cache_name: &str, key: &str, record: JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsCachePutAll)]
    fn js_cache_put_all(cache_name: &str, keys: JsValue, records: js_sys::Array) -> Promise;
    #[wasm_bindgen(js_name = jsCacheNames)]
    fn js_cache_names() -> Promise;
    #[wasm_bindgen(js_name = jsCacheDelete)]
    fn js_cache_delete(cache_name: &str) -> Promise;
    #[wasm_bindgen(js_name = jsNetworkFetch)]
    fn js_network_fetch(method: &str, url: &str) -> Promise;
    #[wasm_bindgen(js_name = jsReadResponse)]
    fn js_read_response(response: &web_sys::Response) -> Promise;
}

#[derive(Debug, Serialize, Deserialize)]
struct ResponseMeta {
    status: u16,
    status_text: String,
    response_type: String,
    headers: Vec<(String, String)>,
}

async fn await_promise(promise: Promise) -> Result<JsValue, String> {
    JsFuture::from(promise).await.map_err(js_error_to_string)
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn record_to_response(record: JsValue) -> Result<AssetResponse, String> {
    let body = js_sys::Reflect::get(&record, &JsValue::from_str("body"))
        .map_err(js_error_to_string)?;
    let meta: ResponseMeta = from_value(record).map_err(|e| e.to_string())?;
    Ok(AssetResponse {
        status: meta.status,
        status_text: meta.status_text,
        response_type: ResponseType::parse(&meta.response_type),
        headers: meta.headers,
        body: Uint8Array::new(&body).to_vec(),
    })
}

fn response_to_record(response: &AssetResponse) -> Result<JsValue, String> {
    let meta = ResponseMeta {
        status: response.status,
        status_text: response.status_text.clone(),
        response_type: String::new(),
        headers: response.headers.clone(),
    };
    let record = meta
        .serialize(&Serializer::json_compatible())
        .map_err(|e| e.to_string())?;
    let body = Uint8Array::from(response.body.as_slice());
    js_sys::Reflect::set(&record, &JsValue::from_str("body"), &body)
        .map_err(js_error_to_string)?;
    Ok(record)
}

pub async fn cache_match(cache_name: &str, key: &str) -> Result<Option<AssetResponse>, String> {
    let value = await_promise(js_cache_match(cache_name, key)).await?;
    if value.is_null() || value.is_undefined() {
        Ok(None)
    } else {
        record_to_response(value).map(Some)
    }
}

pub async fn cache_put(cache_name: &str, key: &str, response: &AssetResponse) -> Result<(), String> {
    let record = response_to_record(response)?;
    let _ = await_promise(js_cache_put(cache_name, key, record)).await?;
    Ok(())
}

pub async fn cache_put_all(
    cache_name: &str,
    entries: &[(String, AssetResponse)],
) -> Result<(), String> {
    let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
    let keys = serde_wasm_bindgen::to_value(&keys).map_err(|e| e.to_string())?;
    let records = js_sys::Array::new();
    for (_, response) in entries {
        records.push(&response_to_record(response)?);
    }
    let _ = await_promise(js_cache_put_all(cache_name, keys, records)).await?;
    Ok(())
}

pub async fn cache_names() -> Result<Vec<String>, String> {
    let value = await_promise(js_cache_names()).await?;
    from_value(value).map_err(|e| e.to_string())
}

pub async fn cache_delete(cache_name: &str) -> Result<bool, String> {
    let value = await_promise(js_cache_delete(cache_name)).await?;
    Ok(value.as_bool().unwrap_or(false))
}

pub async fn network_fetch(request: &AssetRequest) -> Result<AssetResponse, String> {
    let record = await_promise(js_network_fetch(request.method.as_str(), &request.url)).await?;
    record_to_response(record)
}

pub async fn read_response(response: &web_sys::Response) -> Result<AssetResponse, String> {
    let record = await_promise(js_read_response(response)).await?;
    record_to_response(record)
}
