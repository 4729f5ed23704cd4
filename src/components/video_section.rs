use std::rc::Rc;

use yew::prelude::*;

use crate::composables::dom::{use_dom, ScrollOptions};
use crate::composables::youtube::{
    create_thumbnail_url, extract_video_id, get_video_info, ThumbnailQuality, VideoState,
    YouTubePlayer,
};
use crate::config;

#[derive(Properties, PartialEq)]
pub struct VideoSectionProps {
    /// Any YouTube watch, share or embed link.
    pub url: String,
}

#[function_component(VideoSection)]
pub fn video_section(props: &VideoSectionProps) -> Html {
    let dom = use_dom();
    let hovered = use_state(|| false);
    let player = {
        let url = props.url.clone();
        use_state(move || {
            let mut player = YouTubePlayer::new();
            let info = get_video_info(&extract_video_id(&url).unwrap_or_default());
            if info.is_valid {
                player.set_video_id(&info.id);
            }
            player
        })
    };

    // Floating preview until the real player has been scrolled to once.
    {
        let dom = dom.clone();
        let hovered = hovered.clone();
        use_effect_with_deps(
            move |_| {
                let check: Rc<dyn Fn()> = {
                    let dom = dom.clone();
                    Rc::new(move || {
                        dom.check_scroll_position(config::FLOATING_VIDEO_SELECTOR, 0.0);
                    })
                };
                check();
                let scroll = dom.add_scroll_listener(check.clone());
                let resize = dom.add_resize_listener(check);

                let enter = {
                    let hovered = hovered.clone();
                    dom.add_pointer_listener(
                        Some(config::FLOATING_VIDEO_SELECTOR),
                        "pointerenter",
                        Rc::new(move || hovered.set(true)),
                    )
                };
                let leave = dom.add_pointer_listener(
                    Some(config::FLOATING_VIDEO_SELECTOR),
                    "pointerleave",
                    Rc::new(move || hovered.set(false)),
                );

                move || {
                    if let Some(id) = scroll {
                        dom.remove_scroll_listener(id);
                    }
                    if let Some(id) = resize {
                        dom.remove_resize_listener(id);
                    }
                    dom.remove_pointer_listener(enter);
                    dom.remove_pointer_listener(leave);
                }
            },
            (),
        );
    }

    let on_loaded = {
        let player = player.clone();
        Callback::from(move |_: Event| {
            let mut next = (*player).clone();
            next.is_api_ready = true;
            next.video_state = VideoState::Cued;
            player.set(next);
        })
    };

    let scroll_to_player = {
        let dom = dom.clone();
        Callback::from(move |_: MouseEvent| {
            dom.scroll_to_element(config::FLOATING_VIDEO_SELECTOR, ScrollOptions::default())
        })
    };

    if !player.is_video_ready() {
        return html! {};
    }

    let poster = player
        .current_video_id()
        .map(|id| create_thumbnail_url(id, ThumbnailQuality::High))
        .unwrap_or_default();

    html! {
        <section id="video" class="video-section">
            <h2>{"See it in action"}</h2>
            <div class={classes!("video", (*hovered).then(|| "video--hovered"), player.is_api_ready.then(|| "video--ready"))}>
                <iframe
                    src={player.video_url()}
                    title="Product walkthrough"
                    allow="autoplay; encrypted-media; picture-in-picture"
                    allowfullscreen=true
                    frameborder="0"
                    loading="lazy"
                    onload={on_loaded}
                />
            </div>
            if dom.is_visible() {
                <button class="video-floating" onclick={scroll_to_player}>
                    <img src={poster} alt="Watch the walkthrough" />
                    <span>{"▶ Watch"}</span>
                </button>
            }
            <style>
                {r#"
                .video-section {
                    padding: 4rem 2rem;
                    text-align: center;
                }
                .video {
                    position: relative;
                    max-width: 880px;
                    margin: 0 auto;
                    aspect-ratio: 16 / 9;
                    border-radius: 16px;
                    overflow: hidden;
                    box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
                    transition: transform 0.3s ease;
                }
                .video--hovered {
                    transform: scale(1.01);
                }
                .video iframe {
                    width: 100%;
                    height: 100%;
                }
                .video-floating {
                    position: fixed;
                    right: 1.5rem;
                    bottom: 1.5rem;
                    width: 200px;
                    padding: 0;
                    border: none;
                    border-radius: 12px;
                    overflow: hidden;
                    cursor: pointer;
                    background: #1a1a1a;
                    color: #fff;
                    z-index: 20;
                }
                .video-floating img {
                    width: 100%;
                    display: block;
                }
                .video-floating span {
                    position: absolute;
                    left: 0.75rem;
                    bottom: 0.5rem;
                }
                "#}
            </style>
        </section>
    }
}
