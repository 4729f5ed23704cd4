use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde_json::{json, Value};
use yew::prelude::*;

use crate::components::lead_form::LeadForm;
use crate::components::video_section::VideoSection;
use crate::composables::content::{
    format_content, generate_unique_id, validate_content, ContentRule, ContentSchema,
    ContentStore, ContentType, Formatters,
};
use crate::composables::dom::{use_dom, ScrollOptions};
use crate::composables::image_loader::ImageLoader;

const WALKTHROUGH_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn landing_content() -> Value {
    json!([
        {
            "id": "hero",
            "type": "hero",
            "title": "Your phone, without the noise",
            "body": "Leave your number and we'll walk you through setting up calls and texts that only reach you when it matters.",
            "image": "hero.webp"
        },
        {
            "id": "calls",
            "type": "feature",
            "title": "calls that matter",
            "body": "Important callers ring through. Everyone else waits."
        },
        {
            "id": "digest",
            "type": "feature",
            "title": "one daily digest",
            "body": "Messages are summarised into a single SMS at the time you pick."
        },
        {
            "id": "anywhere",
            "type": "feature",
            "title": "works on any phone",
            "body": "Smartphone or a 20 year old flip phone, no app needed."
        }
    ])
}

fn section_schema() -> ContentSchema {
    let mut schema = BTreeMap::new();
    schema.insert(
        "id".to_string(),
        ContentRule {
            required: true,
            kind: Some(ContentType::String),
            pattern: Regex::new("^[a-z][a-z0-9-]*$").ok(),
        },
    );
    schema.insert(
        "title".to_string(),
        ContentRule {
            required: true,
            kind: Some(ContentType::String),
            pattern: None,
        },
    );
    schema
}

fn title_case(value: &Value) -> Value {
    let Some(text) = value.as_str() else {
        return value.clone();
    };
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => json!(first.to_uppercase().chain(chars).collect::<String>()),
        None => value.clone(),
    }
}

fn load_sections() -> ContentStore {
    let mut formatters: Formatters = HashMap::new();
    formatters.insert("title".to_string(), Box::new(title_case));

    let mut store = ContentStore::new();
    store.is_loading = true;

    let mut content = format_content(&landing_content(), &formatters);
    // Sections render keyed by id.
    for item in content.as_array_mut().into_iter().flatten() {
        if let Some(fields) = item.as_object_mut() {
            if !fields.contains_key("id") {
                fields.insert("id".to_string(), json!(generate_unique_id("section")));
            }
        }
    }
    store.set_content(content);

    let schema = section_schema();
    let invalid: Vec<String> = store
        .content()
        .as_array()
        .into_iter()
        .flatten()
        .filter(|item| !validate_content(item, Some(&schema)))
        .map(|item| item.to_string())
        .collect();
    if !invalid.is_empty() {
        store.error = Some(format!("{} malformed section(s)", invalid.len()));
        log::warn!("Malformed sections: {:?}", invalid);
    }
    store.is_loading = false;

    let stats = store.content_stats();
    log::debug!(
        "Landing content loaded: {}",
        serde_json::to_string(&stats).unwrap_or_default()
    );
    store
}

fn text<'a>(item: &'a Value, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or_default()
}

#[function_component(Home)]
pub fn home() -> Html {
    let sections = use_memo(|_| load_sections(), ());
    let dom = use_dom();
    let hero_path = sections
        .get_content_by_id("hero")
        .map(|hero| text(hero, "image").to_string())
        .unwrap_or_default();
    let hero_image = use_memo(
        |path: &String| match ImageLoader::for_document() {
            Ok(mut loader) => {
                loader.load_image(path);
                loader.image_src().to_string()
            }
            Err(err) => {
                log::error!("Failed to load image: {}", err);
                String::new()
            }
        },
        hero_path,
    );

    let to_signup = {
        let dom = dom.clone();
        Callback::from(move |_: MouseEvent| {
            dom.scroll_to_element("#signup", ScrollOptions::default())
        })
    };

    let hero = sections.get_content_by_id("hero").cloned().unwrap_or(Value::Null);
    let features = sections.get_content_by_type("feature");

    html! {
        <div class="landing">
            <header class="hero">
                if !hero_image.is_empty() {
                    <img class="hero__image" src={(*hero_image).clone()} alt="" loading="eager" />
                }
                <div class="hero__content">
                    <h1>{ text(&hero, "title") }</h1>
                    <p class="hero__subtitle">{ text(&hero, "body") }</p>
                    <button class="hero-cta" onclick={to_signup}>{"Get Started"}</button>
                </div>
            </header>

            <section class="features">
                { for features.iter().map(|feature| html! {
                    <div class="feature" key={text(feature, "id").to_string()}>
                        <h3>{ text(feature, "title") }</h3>
                        <p>{ text(feature, "body") }</p>
                    </div>
                }) }
            </section>

            <VideoSection url={WALKTHROUGH_URL.to_string()} />

            <LeadForm />

            <style>
                {r#"
                .landing {
                    min-height: 100vh;
                    background: #1a1a1a;
                    color: #ffffff;
                    overflow-x: hidden;
                }
                .hero {
                    position: relative;
                    min-height: 80vh;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    padding: 6rem 2rem;
                }
                .hero__image {
                    position: absolute;
                    inset: 0;
                    width: 100%;
                    height: 100%;
                    object-fit: cover;
                    opacity: 0.35;
                    z-index: 0;
                }
                .hero__content {
                    position: relative;
                    z-index: 1;
                    max-width: 640px;
                    text-align: center;
                }
                .hero__content h1 {
                    font-size: 3.5rem;
                    background: linear-gradient(45deg, #fff, #7EB2FF);
                    -webkit-background-clip: text;
                    -webkit-text-fill-color: transparent;
                }
                .hero__subtitle {
                    color: #999;
                    font-size: 1.2rem;
                    line-height: 1.6;
                }
                .hero-cta {
                    background: linear-gradient(45deg, #7EB2FF, #4169E1);
                    color: white;
                    border: none;
                    padding: 1rem 2.5rem;
                    border-radius: 8px;
                    font-size: 1.1rem;
                    cursor: pointer;
                    transition: transform 0.3s ease, box-shadow 0.3s ease;
                }
                .hero-cta:hover {
                    transform: translateY(-2px);
                    box-shadow: 0 4px 20px rgba(30, 144, 255, 0.3);
                }
                .features {
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
                    gap: 2rem;
                    max-width: 1000px;
                    margin: 0 auto;
                    padding: 4rem 2rem;
                }
                .feature h3 {
                    color: #7EB2FF;
                }
                .feature p {
                    color: #999;
                }
                @media (max-width: 768px) {
                    .hero__content h1 {
                        font-size: 2.4rem;
                    }
                }
                "#}
            </style>
        </div>
    }
}
