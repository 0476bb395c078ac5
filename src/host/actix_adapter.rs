//! actix-web 호스트 어댑터
//!
//! `HttpRequest`와 본문 바이트를 [`RequestPayload`]로 옮기고,
//! 파이프라인 [`Response`]를 `HttpResponse`로 되돌립니다.
//!
//! 속성은 쿼리 문자열, urlencoded 폼 본문, JSON 객체 본문 순서로 채워지며
//! 뒤에 오는 값이 같은 키를 덮어씁니다.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use serde_json::Value;

use crate::http::{RequestPayload, Response};

/// `HttpRequest`에서 요청 원천을 만듭니다.
pub fn payload_from_http(req: &HttpRequest, body: &[u8]) -> RequestPayload {
    let uri = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let mut payload = RequestPayload::new(req.method().as_str(), uri);

    payload
        .server
        .insert("SERVER_PROTOCOL".to_string(), format!("{:?}", req.version()));
    if let Some(addr) = req.peer_addr() {
        payload.server.insert("REMOTE_ADDR".to_string(), addr.ip().to_string());
    }

    for (name, value) in req.headers() {
        let Ok(value) = value.to_str() else {
            log::debug!("Skipping non-ASCII header [{}]", name);
            continue;
        };
        let name = name.as_str().to_lowercase();
        payload.server.insert(
            format!("HTTP_{}", name.to_uppercase().replace('-', "_")),
            value.to_string(),
        );
        payload.headers.insert(name, value.to_string());
    }

    match req.cookies() {
        Ok(cookies) => {
            for cookie in cookies.iter() {
                payload
                    .cookies
                    .insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }
        Err(e) => log::debug!("Ignoring malformed cookie header: {}", e),
    }

    payload.attributes.extend(parse_query_string(req.query_string()));
    payload.attributes.extend(parse_body(req.content_type(), body));

    payload
}

/// `a=1&b=x+y` 형태의 문자열을 속성으로 파싱합니다.
pub fn parse_query_string(query: &str) -> BTreeMap<String, Value> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key, Value::String(value)))
        })
        .collect()
}

fn parse_body(content_type: &str, body: &[u8]) -> BTreeMap<String, Value> {
    if body.is_empty() {
        return BTreeMap::new();
    }

    match content_type {
        "application/x-www-form-urlencoded" => match std::str::from_utf8(body) {
            Ok(form) => parse_query_string(form),
            Err(e) => {
                log::debug!("Invalid UTF-8 in form body: {}", e);
                BTreeMap::new()
            }
        },
        "application/json" => match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            Ok(other) => BTreeMap::from([("_json".to_string(), other)]),
            Err(e) => {
                log::debug!("Invalid JSON body: {}", e);
                BTreeMap::new()
            }
        },
        _ => BTreeMap::new(),
    }
}

/// 파이프라인 응답을 `HttpResponse`로 변환합니다.
pub fn into_http_response(response: Response) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    for (name, value) in response.headers() {
        builder.insert_header((name.as_str(), value.as_str()));
    }

    if response.body().is_null() {
        builder.finish()
    } else {
        builder.json(response.body())
    }
}
