//! In-memory stand-in for the LaunchDarkly REST API.
#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use launchdarkly_provider::{
    http::{HttpMethod, HttpRequest, HttpResponse, Transport},
    Provider, ProviderConfig,
};
use serde_json::{json, Map, Value};

pub const BASE_URL: &str = "https://fake.test/api/v2";

/// Environments the API seeds every new project with.
pub const SEEDED_ENVIRONMENTS: [&str; 2] = ["production", "test"];

#[derive(Default)]
struct Project {
    name: String,
    environments: Vec<Value>,
    flags: BTreeMap<String, Value>,
}

#[derive(Default)]
struct State {
    projects: BTreeMap<String, Project>,
    requests: Vec<HttpRequest>,
    dummy_creations: usize,
    rate_limited_patches: usize,
    flag_patches: usize,
    failing_patch: Option<(usize, u16)>,
}

/// Cheap to clone, every clone shares the same remote state.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn provider(api: &FakeApi) -> Provider {
    init();
    ProviderConfig::from_access_token("api-token")
        .base_url(BASE_URL)
        .retry_delay(|_: std::time::Duration| {})
        .transport(api.clone())
        .to_provider()
        .unwrap()
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn not_found() -> HttpResponse {
    respond(404, json!({"code": "not_found", "message": "Unknown resource"}))
}

fn bad_request(message: &str) -> HttpResponse {
    respond(400, json!({"code": "invalid_request", "message": message}))
}

impl FakeApi {
    pub fn new() -> FakeApi {
        FakeApi::default()
    }

    /// Keys of the environments currently in `project`, in creation order.
    pub fn environment_keys(&self, project: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.projects[project]
            .environments
            .iter()
            .map(|environment| environment["key"].as_str().unwrap().to_owned())
            .collect()
    }

    /// The stored flag, as the API would return it.
    pub fn flag(&self, project: &str, key: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.projects.get(project)?.flags.get(key).cloned()
    }

    /// Overwrite part of a stored flag, simulating a change made outside the provider.
    pub fn edit_flag(&self, project: &str, key: &str, edit: impl FnOnce(&mut Value)) {
        let mut state = self.state.lock().unwrap();
        let flag = state
            .projects
            .get_mut(project)
            .and_then(|project| project.flags.get_mut(key))
            .unwrap();
        edit(flag);
    }

    pub fn remove_project(&self, project: &str) {
        self.state.lock().unwrap().projects.remove(project);
    }

    pub fn dummy_creations(&self) -> usize {
        self.state.lock().unwrap().dummy_creations
    }

    /// Answer the next `count` flag `PATCH`es with 429.
    pub fn rate_limit_patches(&self, count: usize) {
        self.state.lock().unwrap().rate_limited_patches = count;
    }

    /// Answer the `number`th flag `PATCH` from now (1-based) with `status`, once.
    pub fn fail_patch_number(&self, number: usize, status: u16) {
        let mut state = self.state.lock().unwrap();
        let target = state.flag_patches + number;
        state.failing_patch = Some((target, status));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Decoded bodies of every `PATCH` sent to `url`.
    pub fn patches(&self, url: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == HttpMethod::Patch && request.url == url)
            .map(|request| serde_json::from_str(&request.body).unwrap())
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }
}

impl Transport for FakeApi {
    fn send(&self, request: &HttpRequest) -> launchdarkly_provider::Result<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let path = request
            .url
            .strip_prefix(BASE_URL)
            .expect("request outside of the fake API");
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let body: Value = serde_json::from_str(&request.body).unwrap_or(Value::Null);

        let response = match (request.method, segments.as_slice()) {
            (HttpMethod::Post, ["projects"]) => create_project(&mut state, body),
            (method, ["projects", project]) => project_route(&mut state, method, project, body),
            (HttpMethod::Post, ["projects", project, "environments"]) => {
                create_environment(&mut state, project, body)
            }
            (method, ["projects", project, "environments", environment]) => {
                environment_route(&mut state, method, project, environment, body)
            }
            (HttpMethod::Post, ["flags", project]) => create_flag(&mut state, project, body),
            (method, ["flags", project, flag]) => flag_route(&mut state, method, project, flag, body),
            _ => not_found(),
        };
        Ok(response)
    }
}

fn environment_json(key: &str, name: &str, color: &str) -> Value {
    json!({
        "_id": format!("id-{key}"),
        "key": key,
        "name": name,
        "color": color,
        "apiKey": format!("sdk-{key}"),
        "mobileKey": format!("mob-{key}"),
        "defaultTtl": 0,
    })
}

fn project_json(key: &str, project: &Project) -> Value {
    json!({
        "_id": format!("id-{key}"),
        "key": key,
        "name": project.name,
        "environments": project.environments,
    })
}

fn create_project(state: &mut State, body: Value) -> HttpResponse {
    let key = body["key"].as_str().unwrap_or_default().to_owned();
    if state.projects.contains_key(&key) {
        return respond(409, json!({"code": "conflict", "message": "key exists"}));
    }
    let project = Project {
        name: body["name"].as_str().unwrap_or_default().to_owned(),
        environments: SEEDED_ENVIRONMENTS
            .iter()
            .map(|key| environment_json(key, key, "417505"))
            .collect(),
        flags: BTreeMap::new(),
    };
    let response = project_json(&key, &project);
    state.projects.insert(key, project);
    respond(201, response)
}

fn project_route(state: &mut State, method: HttpMethod, key: &str, body: Value) -> HttpResponse {
    match method {
        HttpMethod::Get => match state.projects.get(key) {
            Some(project) => respond(200, project_json(key, project)),
            None => not_found(),
        },
        HttpMethod::Patch => {
            let Some(project) = state.projects.get_mut(key) else {
                return not_found();
            };
            let mut document = json!({"name": project.name});
            if let Err(message) = apply_patch(&mut document, body) {
                return bad_request(&message);
            }
            project.name = document["name"].as_str().unwrap_or_default().to_owned();
            respond(200, project_json(key, project))
        }
        HttpMethod::Delete => match state.projects.remove(key) {
            Some(_) => respond(204, Value::Null),
            None => not_found(),
        },
        HttpMethod::Post => not_found(),
    }
}

fn create_environment(state: &mut State, project: &str, body: Value) -> HttpResponse {
    let Some(stored) = state.projects.get_mut(project) else {
        return not_found();
    };
    let key = body["key"].as_str().unwrap_or_default();
    if stored.environments.iter().any(|e| e["key"] == key) {
        return respond(409, json!({"code": "conflict", "message": "key exists"}));
    }
    let environment = environment_json(
        key,
        body["name"].as_str().unwrap_or_default(),
        body["color"].as_str().unwrap_or_default(),
    );
    stored.environments.push(environment.clone());
    for flag in stored.flags.values_mut() {
        flag["environments"][key] = json!({"fallthrough": {"variation": 0}, "offVariation": 1});
    }
    if key == "dummy-environment" {
        state.dummy_creations += 1;
    }
    respond(201, environment)
}

fn environment_route(
    state: &mut State,
    method: HttpMethod,
    project: &str,
    key: &str,
    body: Value,
) -> HttpResponse {
    let Some(stored) = state.projects.get_mut(project) else {
        return not_found();
    };
    let Some(position) = stored.environments.iter().position(|e| e["key"] == key) else {
        return not_found();
    };
    match method {
        HttpMethod::Get => respond(200, stored.environments[position].clone()),
        HttpMethod::Patch => {
            let mut patched = stored.environments[position].clone();
            match apply_patch(&mut patched, body) {
                Ok(()) => {
                    stored.environments[position] = patched.clone();
                    respond(200, patched)
                }
                Err(message) => bad_request(&message),
            }
        }
        HttpMethod::Delete => {
            if stored.environments.len() == 1 {
                return bad_request("cannot delete the last environment of a project");
            }
            stored.environments.remove(position);
            respond(204, Value::Null)
        }
        HttpMethod::Post => not_found(),
    }
}

fn default_variations() -> Value {
    json!([
        {"value": true, "name": "", "description": ""},
        {"value": false, "name": "", "description": ""},
    ])
}

fn create_flag(state: &mut State, project: &str, mut body: Value) -> HttpResponse {
    let Some(stored) = state.projects.get_mut(project) else {
        return not_found();
    };
    let key = body["key"].as_str().unwrap_or_default().to_owned();
    if stored.flags.contains_key(&key) {
        return respond(409, json!({"code": "conflict", "message": "key exists"}));
    }

    let Some(flag) = body.as_object_mut() else {
        return bad_request("expected an object");
    };
    let variations = flag
        .entry("variations")
        .or_insert_with(default_variations);
    if variations.as_array().map_or(true, Vec::is_empty) {
        *variations = default_variations();
    }
    let boolean = variations
        .as_array()
        .map_or(false, |values| values.iter().all(|v| v["value"].is_boolean()));
    flag.insert(
        "kind".to_owned(),
        json!(if boolean { "boolean" } else { "multivariate" }),
    );
    flag.entry("tags").or_insert_with(|| json!([]));
    flag.entry("customProperties").or_insert_with(|| json!({}));
    let environments: Map<String, Value> = stored
        .environments
        .iter()
        .map(|environment| {
            (
                environment["key"].as_str().unwrap_or_default().to_owned(),
                json!({"fallthrough": {"variation": 0}, "offVariation": 1}),
            )
        })
        .collect();
    flag.insert("environments".to_owned(), Value::Object(environments));

    stored.flags.insert(key, body.clone());
    respond(201, body)
}

fn flag_route(
    state: &mut State,
    method: HttpMethod,
    project: &str,
    key: &str,
    body: Value,
) -> HttpResponse {
    if method == HttpMethod::Patch {
        if state.rate_limited_patches > 0 {
            state.rate_limited_patches -= 1;
            return respond(429, json!({"code": "rate_limited", "message": "slow down"}));
        }
        state.flag_patches += 1;
        if let Some((number, status)) = state.failing_patch {
            if number == state.flag_patches {
                state.failing_patch = None;
                return respond(status, json!({"code": "internal", "message": "boom"}));
            }
        }
    }
    let Some(stored) = state.projects.get_mut(project) else {
        return not_found();
    };
    match method {
        HttpMethod::Get => match stored.flags.get(key) {
            Some(flag) => respond(200, flag.clone()),
            None => not_found(),
        },
        HttpMethod::Patch => {
            let Some(flag) = stored.flags.get_mut(key) else {
                return not_found();
            };
            // JSON Patch documents apply atomically.
            let mut patched = flag.clone();
            match apply_patch(&mut patched, body) {
                Ok(()) => {
                    *flag = patched;
                    respond(200, flag.clone())
                }
                Err(message) => bad_request(&message),
            }
        }
        HttpMethod::Delete => match stored.flags.remove(key) {
            Some(_) => respond(204, Value::Null),
            None => not_found(),
        },
        HttpMethod::Post => not_found(),
    }
}

/// Applies a JSON Patch document. Paths that do not exist fail as RFC 6902 requires.
fn apply_patch(document: &mut Value, patch: Value) -> Result<(), String> {
    let operations: json_patch::Patch =
        serde_json::from_value(patch).map_err(|err| err.to_string())?;
    json_patch::patch(document, &operations).map_err(|err| err.to_string())
}
