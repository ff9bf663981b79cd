//! Provider-shaped JSON payloads.

use serde_json::{Value, json};

use super::StubUpstream;

pub fn imdb_for(person_id: u64) -> String {
    format!("nm{person_id:07}")
}

pub fn movie(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "original_title": title,
        "overview": format!("Overview of {title}"),
        "release_date": "1999-03-31",
        "vote_average": 8.2,
        "vote_count": 24000,
        "runtime": 136,
        "poster_path": format!("/poster-{id}.jpg"),
        "backdrop_path": null,
        "genres": [{ "id": 28, "name": "Action" }],
        "imdb_id": format!("tt{id:07}"),
    })
}

pub fn credits(movie_id: u64, cast: &[u64], crew: &[u64]) -> Value {
    let cast: Vec<Value> = cast
        .iter()
        .enumerate()
        .map(|(order, id)| {
            json!({
                "id": id,
                "name": format!("Actor {id}"),
                "character": format!("Role {id}"),
                "order": order,
                "credit_id": format!("cast-{id}"),
            })
        })
        .collect();
    let crew: Vec<Value> = crew
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Crew {id}"),
                "job": "Director",
                "department": "Directing",
                "credit_id": format!("crew-{id}"),
            })
        })
        .collect();

    json!({ "id": movie_id, "cast": cast, "crew": crew })
}

pub fn person_external_ids(person_id: u64) -> Value {
    json!({
        "id": person_id,
        "imdb_id": imdb_for(person_id),
        "facebook_id": null,
        "instagram_id": null,
        "twitter_id": null,
    })
}

pub fn videos(movie_id: u64, entries: &[(&str, &str, &str)]) -> Value {
    let results: Vec<Value> = entries
        .iter()
        .map(|(key, site, kind)| {
            json!({
                "key": key,
                "name": format!("{kind} {key}"),
                "site": site,
                "type": kind,
                "official": true,
                "iso_639_1": "en",
                "iso_3166_1": "US",
            })
        })
        .collect();
    json!({ "id": movie_id, "results": results })
}

pub fn movie_page(page: u32, ids: &[u64]) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Movie {id}"),
                "overview": "",
                "release_date": "",
                "poster_path": null,
                "vote_average": 7.0,
                "popularity": 10.5,
            })
        })
        .collect();
    json!({
        "page": page,
        "results": results,
        "total_pages": 5,
        "total_results": 100,
    })
}

/// Scripts a fully resolvable movie: base record, credits with every
/// person resolvable, one YouTube trailer and two similar titles.
pub fn script_movie(stub: &StubUpstream, id: u64, cast: &[u64], crew: &[u64]) {
    stub.respond(format!("/movie/{id}"), movie(id, &format!("Movie {id}")))
        .respond(format!("/movie/{id}/credits"), credits(id, cast, crew))
        .respond(
            format!("/movie/{id}/videos"),
            videos(id, &[("trailer-key", "YouTube", "Trailer")]),
        )
        .respond(
            format!("/movie/{id}/similar"),
            movie_page(1, &[id + 1000, id + 2000]),
        );

    for person in cast.iter().chain(crew) {
        stub.respond(
            format!("/person/{person}/external_ids"),
            person_external_ids(*person),
        );
    }
}
