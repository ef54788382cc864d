//! In-memory imitation of the joind.in v2.1 API.
//!
//! Serves the event, talk, comment and user endpoints from fixture data with
//! the same envelopes the real API uses: a payload key (`events`, `talks`,
//! ...) holding a list, plus a `meta` block. Detail endpoints answer with a
//! one-element list. List entries carry `uri` links built from the request's
//! `Host` header and no `id` field.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const API_VERSION: &str = "v2.1";
pub const DEFAULT_RESULTS_PER_PAGE: usize = 20;

#[derive(Clone, Debug)]
pub struct Event {
    pub id: u64,
    pub name: String,
    pub url_friendly_name: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Talk {
    pub id: u64,
    pub event_id: u64,
    pub talk_title: String,
    pub talk_description: String,
    pub start_date: String,
    pub speaker_ids: Vec<u64>,
}

/// A comment on an event or on a talk, depending on which list holds it.
#[derive(Clone, Debug)]
pub struct Comment {
    pub id: u64,
    pub target_id: u64,
    pub user_id: u64,
    pub comment: String,
    pub rating: u8,
    pub created_date: String,
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub full_name: String,
    pub twitter_username: String,
}

#[derive(Clone, Debug, Default)]
pub struct Fixtures {
    pub events: Vec<Event>,
    pub talks: Vec<Talk>,
    pub event_comments: Vec<Comment>,
    pub talk_comments: Vec<Comment>,
    pub users: Vec<User>,
    /// `(user_id, event_id)` pairs.
    pub attendance: Vec<(u64, u64)>,
}

impl Fixtures {
    /// Three events, five talks, three users and a handful of comments.
    pub fn sample() -> Self {
        fn event(
            id: u64,
            name: &str,
            stub: &str,
            (start, end): (&str, &str),
            location: &str,
            tags: &[&str],
        ) -> Event {
            Event {
                id,
                name: name.to_string(),
                url_friendly_name: stub.to_string(),
                start_date: start.to_string(),
                end_date: end.to_string(),
                location: location.to_string(),
                description: format!("{name} in {location}"),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            }
        }
        let talk = |id: u64, event_id: u64, title: &str, start: &str, speakers: &[u64]| Talk {
            id,
            event_id,
            talk_title: title.to_string(),
            talk_description: format!("A session about {title}"),
            start_date: start.to_string(),
            speaker_ids: speakers.to_vec(),
        };
        let comment = |id: u64, target_id: u64, user_id: u64, text: &str, rating: u8| Comment {
            id,
            target_id,
            user_id,
            comment: text.to_string(),
            rating,
            created_date: "2024-02-01T10:00:00+00:00".to_string(),
        };
        let user = |id: u64, username: &str, full_name: &str| User {
            id,
            username: username.to_string(),
            full_name: full_name.to_string(),
            twitter_username: username.to_string(),
        };

        Fixtures {
            events: vec![
                event(
                    1,
                    "PHP Benelux",
                    "phpbnl24",
                    ("2024-01-26T09:00:00+01:00", "2024-01-27T18:00:00+01:00"),
                    "Antwerp",
                    &["php", "benelux"],
                ),
                event(
                    2,
                    "PHP UK Conference",
                    "phpuk24",
                    ("2024-02-15T09:00:00+00:00", "2024-02-16T18:00:00+00:00"),
                    "London",
                    &["php"],
                ),
                event(
                    3,
                    "RustFest",
                    "rustfest24",
                    ("2024-06-10T09:00:00+02:00", "2024-06-11T18:00:00+02:00"),
                    "Zurich",
                    &["rust"],
                ),
            ],
            talks: vec![
                talk(10, 1, "Static analysis in anger", "2024-01-26T10:00:00+01:00", &[100]),
                talk(11, 1, "Async PHP", "2024-01-26T11:00:00+01:00", &[101]),
                talk(12, 2, "Event sourcing", "2024-02-15T10:00:00+00:00", &[100, 102]),
                talk(13, 3, "Ownership for the rest of us", "2024-06-10T10:00:00+02:00", &[102]),
                talk(14, 3, "Writing API clients", "2024-06-10T14:00:00+02:00", &[100]),
            ],
            event_comments: vec![
                comment(500, 1, 101, "Great venue", 5),
                comment(501, 1, 102, "Too much coffee", 4),
                comment(502, 2, 100, "Well organised", 5),
            ],
            talk_comments: vec![
                comment(900, 10, 101, "Learned a lot", 5),
                comment(901, 10, 102, "Slides were dense", 3),
                comment(902, 13, 100, "Clear examples", 4),
            ],
            users: vec![
                user(100, "lornajane", "Lorna Mitchell"),
                user(101, "derickr", "Derick Rethans"),
                user(102, "ferris", "Ferris Crab"),
            ],
            attendance: vec![(100, 1), (100, 2), (101, 1), (102, 3)],
        }
    }

    fn event(&self, id: u64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    fn talk(&self, id: u64) -> Option<&Talk> {
        self.talks.iter().find(|t| t.id == id)
    }

    fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

pub type Db = Arc<Fixtures>;

/// Query parameters shared by the joind.in endpoints. Unknown keys are
/// accepted and ignored, as the real API does.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub resultsperpage: Option<usize>,
    pub start: Option<usize>,
    pub verbose: Option<String>,
    pub title: Option<String>,
    pub stub: Option<String>,
    pub tags: Option<String>,
}

impl ListQuery {
    fn is_verbose(&self) -> bool {
        self.verbose.as_deref() == Some("yes")
    }
}

pub fn app() -> Router {
    app_with(Fixtures::sample())
}

pub fn app_with(fixtures: Fixtures) -> Router {
    let db: Db = Arc::new(fixtures);
    let api = Router::new()
        .route("/events", get(list_events))
        .route("/events/{event_id}", get(get_event))
        .route("/events/{event_id}/comments", get(list_event_comments))
        .route("/events/{event_id}/talks", get(list_event_talks))
        .route("/talks/{talk_id}", get(get_talk))
        .route("/talks/{talk_id}/comments", get(list_talk_comments))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/attended-events", get(list_attended_events))
        .route("/users/{user_id}/talks", get(list_user_talks))
        .with_state(db);
    Router::new().nest(&format!("/{API_VERSION}"), api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// 404 with the API's `["<Thing> not found"]` body.
pub struct NotFound(&'static str);

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, Json(json!([self.0]))).into_response()
    }
}

type ApiResult = Result<Json<Value>, NotFound>;

/// Request context needed to build links and the `meta` block.
struct Links {
    root: String,
    host: String,
    path: String,
}

impl Links {
    fn new(headers: &HeaderMap, uri: &OriginalUri) -> Self {
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost")
            .to_string();
        Self {
            root: format!("http://{host}/{API_VERSION}"),
            path: uri.0.path().to_string(),
            host,
        }
    }

    fn page_url(&self, per_page: usize, start: usize) -> String {
        format!("http://{}{}?resultsperpage={per_page}&start={start}", self.host, self.path)
    }
}

/// Slice `items` per `resultsperpage`/`start` and wrap them in the envelope.
fn envelope(key: &str, items: Vec<Value>, query: &ListQuery, links: &Links) -> Json<Value> {
    let total = items.len();
    let per_page = query.resultsperpage.unwrap_or(DEFAULT_RESULTS_PER_PAGE);
    let start = query.start.unwrap_or(0);
    let page: Vec<Value> = items.into_iter().skip(start).take(per_page).collect();

    let mut meta = json!({
        "count": page.len(),
        "total": total,
        "this_page": links.page_url(per_page, start),
    });
    if start + page.len() < total {
        meta["next_page"] = json!(links.page_url(per_page, start + per_page));
    }
    if start > 0 {
        meta["prev_page"] = json!(links.page_url(per_page, start.saturating_sub(per_page)));
    }
    Json(json!({ key: page, "meta": meta }))
}

fn event_json(db: &Fixtures, event: &Event, root: &str, verbose: bool) -> Value {
    let uri = format!("{root}/events/{}", event.id);
    let mut value = json!({
        "name": event.name,
        "start_date": event.start_date,
        "end_date": event.end_date,
        "description": event.description,
        "attendee_count": db.attendance.iter().filter(|(_, e)| *e == event.id).count(),
        "uri": uri,
        "verbose_uri": format!("{uri}?verbose=yes"),
        "comments_uri": format!("{uri}/comments"),
        "talks_uri": format!("{uri}/talks"),
        "website_uri": format!("https://joind.in/event/{}", event.url_friendly_name),
    });
    if verbose {
        value["url_friendly_name"] = json!(event.url_friendly_name);
        value["location"] = json!(event.location);
        value["tags"] = json!(event.tags);
        value["talks_count"] = json!(db.talks.iter().filter(|t| t.event_id == event.id).count());
        value["event_comments_count"] =
            json!(db.event_comments.iter().filter(|c| c.target_id == event.id).count());
    }
    value
}

fn talk_json(db: &Fixtures, talk: &Talk, root: &str, verbose: bool) -> Value {
    let uri = format!("{root}/talks/{}", talk.id);
    let speakers: Vec<Value> = talk
        .speaker_ids
        .iter()
        .filter_map(|id| db.user(*id))
        .map(|u| {
            json!({
                "speaker_name": u.full_name,
                "speaker_uri": format!("{root}/users/{}", u.id),
            })
        })
        .collect();
    let mut value = json!({
        "talk_title": talk.talk_title,
        "talk_description": talk.talk_description,
        "start_date": talk.start_date,
        "speakers": speakers,
        "uri": uri,
        "verbose_uri": format!("{uri}?verbose=yes"),
        "comments_uri": format!("{uri}/comments"),
        "event_uri": format!("{root}/events/{}", talk.event_id),
        "website_uri": format!("https://joind.in/talk/{}", talk.id),
    });
    if verbose {
        let ratings: Vec<u8> = db
            .talk_comments
            .iter()
            .filter(|c| c.target_id == talk.id)
            .map(|c| c.rating)
            .collect();
        value["comment_count"] = json!(ratings.len());
        value["average_rating"] = if ratings.is_empty() {
            Value::Null
        } else {
            json!(ratings.iter().map(|r| u64::from(*r)).sum::<u64>() / ratings.len() as u64)
        };
    }
    value
}

fn comment_json(db: &Fixtures, comment: &Comment, root: &str, kind: &str, target: &str) -> Value {
    let author = db.user(comment.user_id);
    let collection = if target == "event_uri" { "events" } else { "talks" };
    json!({
        "comment": comment.comment,
        "rating": comment.rating,
        "created_date": comment.created_date,
        "user_display_name": author.map(|u| u.full_name.as_str()),
        "user_uri": format!("{root}/users/{}", comment.user_id),
        "uri": format!("{root}/{kind}/{}", comment.id),
        target: format!("{root}/{collection}/{}", comment.target_id),
    })
}

fn user_json(user: &User, root: &str, verbose: bool) -> Value {
    let uri = format!("{root}/users/{}", user.id);
    let mut value = json!({
        "username": user.username,
        "full_name": user.full_name,
        "twitter_username": user.twitter_username,
        "uri": uri,
        "verbose_uri": format!("{uri}?verbose=yes"),
        "website_uri": format!("https://joind.in/user/{}", user.username),
        "talks_uri": format!("{uri}/talks"),
        "attended_events_uri": format!("{uri}/attended-events"),
    });
    if verbose {
        value["gravatar_hash"] = json!(format!("{:032x}", user.id));
    }
    value
}

async fn list_events(
    State(db): State<Db>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    let links = Links::new(&headers, &uri);
    let events = db
        .events
        .iter()
        .filter(|e| query.title.as_ref().map_or(true, |t| e.name.eq_ignore_ascii_case(t)))
        .filter(|e| query.stub.as_ref().map_or(true, |s| &e.url_friendly_name == s))
        .filter(|e| query.tags.as_ref().map_or(true, |t| e.tags.iter().any(|tag| tag == t)))
        .map(|e| event_json(&db, e, &links.root, query.is_verbose()))
        .collect();
    envelope("events", events, &query, &links)
}

async fn get_event(
    State(db): State<Db>,
    Path(event_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    let event = db.event(event_id).ok_or(NotFound("Event not found"))?;
    let item = event_json(&db, event, &links.root, query.is_verbose());
    Ok(envelope("events", vec![item], &query, &links))
}

async fn list_event_comments(
    State(db): State<Db>,
    Path(event_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    db.event(event_id).ok_or(NotFound("Event not found"))?;
    let comments = db
        .event_comments
        .iter()
        .filter(|c| c.target_id == event_id)
        .map(|c| comment_json(&db, c, &links.root, "event_comments", "event_uri"))
        .collect();
    Ok(envelope("comments", comments, &query, &links))
}

async fn list_event_talks(
    State(db): State<Db>,
    Path(event_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    db.event(event_id).ok_or(NotFound("Event not found"))?;
    let talks = db
        .talks
        .iter()
        .filter(|t| t.event_id == event_id)
        .map(|t| talk_json(&db, t, &links.root, query.is_verbose()))
        .collect();
    Ok(envelope("talks", talks, &query, &links))
}

async fn get_talk(
    State(db): State<Db>,
    Path(talk_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    let talk = db.talk(talk_id).ok_or(NotFound("Talk not found"))?;
    let item = talk_json(&db, talk, &links.root, query.is_verbose());
    Ok(envelope("talks", vec![item], &query, &links))
}

async fn list_talk_comments(
    State(db): State<Db>,
    Path(talk_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    db.talk(talk_id).ok_or(NotFound("Talk not found"))?;
    let comments = db
        .talk_comments
        .iter()
        .filter(|c| c.target_id == talk_id)
        .map(|c| comment_json(&db, c, &links.root, "talk_comments", "talk_uri"))
        .collect();
    Ok(envelope("comments", comments, &query, &links))
}

async fn get_user(
    State(db): State<Db>,
    Path(user_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    let user = db.user(user_id).ok_or(NotFound("User not found"))?;
    let item = user_json(user, &links.root, query.is_verbose());
    Ok(envelope("users", vec![item], &query, &links))
}

async fn list_attended_events(
    State(db): State<Db>,
    Path(user_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    db.user(user_id).ok_or(NotFound("User not found"))?;
    let events = db
        .attendance
        .iter()
        .filter(|(user, _)| *user == user_id)
        .filter_map(|(_, event_id)| db.event(*event_id))
        .map(|e| event_json(&db, e, &links.root, query.is_verbose()))
        .collect();
    Ok(envelope("events", events, &query, &links))
}

async fn list_user_talks(
    State(db): State<Db>,
    Path(user_id): Path<u64>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let links = Links::new(&headers, &uri);
    db.user(user_id).ok_or(NotFound("User not found"))?;
    let talks = db
        .talks
        .iter()
        .filter(|t| t.speaker_ids.contains(&user_id))
        .map(|t| talk_json(&db, t, &links.root, query.is_verbose()))
        .collect();
    Ok(envelope("talks", talks, &query, &links))
}
