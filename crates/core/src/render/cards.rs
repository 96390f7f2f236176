use tracing::debug;

use super::font::calculate_font_size;
use super::styles::{default_stylesheet, inline_styles, RingStyle};
use super::template::{escape_xml, fill, format_decimal};
use super::RenderError;
use crate::domain::milestones::calculate_milestones;
use crate::domain::model::{
    AnimeStats, CardColors, ItemKind, MangaStats, MediaFormat, SocialStats, TopItem,
};

const ANIME_STATS_SVG: &str = include_str!("../../res/svg/anime_stats.svg");
const MANGA_STATS_SVG: &str = include_str!("../../res/svg/manga_stats.svg");
const SOCIAL_STATS_SVG: &str = include_str!("../../res/svg/social_stats.svg");
const EXTRA_STATS_SVG: &str = include_str!("../../res/svg/extra_stats.svg");

const HEADER_FONT_SIZE: u32 = 18;
const HEADER_MAX_WIDTH: f64 = 320.0;
const ROW_HEIGHT: u32 = 25;
const ROW_DELAY_MS: u32 = 150;

pub fn anime_stats(
    stats: &AnimeStats,
    username: &str,
    colors: &CardColors,
) -> Result<String, RenderError> {
    let milestones = calculate_milestones(stats.episodes_watched);
    debug!(username, current = milestones.current, "anime milestones calculated");

    let svg = fill(
        ANIME_STATS_SVG,
        &[
            ("username", escape_xml(username)),
            ("count", stats.count.to_string()),
            ("episodes_watched", stats.episodes_watched.to_string()),
            ("minutes_watched", stats.minutes_watched.to_string()),
            ("mean_score", format_decimal(stats.mean_score)),
            ("standard_deviation", format_decimal(stats.standard_deviation)),
            ("previous_milestone", milestones.previous.to_string()),
            ("current_milestone", milestones.current.to_string()),
        ],
    )?;

    let css = default_stylesheet(
        colors,
        RingStyle {
            dasharray: milestones.dasharray,
            dashoffset: milestones.dashoffset,
        },
    )?;
    inline_styles(&svg, &css)
}

pub fn manga_stats(
    stats: &MangaStats,
    username: &str,
    colors: &CardColors,
) -> Result<String, RenderError> {
    let milestones = calculate_milestones(stats.chapters_read);
    debug!(username, current = milestones.current, "manga milestones calculated");

    let svg = fill(
        MANGA_STATS_SVG,
        &[
            ("username", escape_xml(username)),
            ("count", stats.count.to_string()),
            ("chapters_read", stats.chapters_read.to_string()),
            ("volumes_read", stats.volumes_read.to_string()),
            ("mean_score", format_decimal(stats.mean_score)),
            ("standard_deviation", format_decimal(stats.standard_deviation)),
            ("previous_milestone", milestones.previous.to_string()),
            ("current_milestone", milestones.current.to_string()),
        ],
    )?;

    let css = default_stylesheet(
        colors,
        RingStyle {
            dasharray: milestones.dasharray,
            dashoffset: milestones.dashoffset,
        },
    )?;
    inline_styles(&svg, &css)
}

pub fn social_stats(
    stats: &SocialStats,
    username: &str,
    colors: &CardColors,
) -> Result<String, RenderError> {
    let svg = fill(
        SOCIAL_STATS_SVG,
        &[
            ("username", escape_xml(username)),
            ("total_followers", stats.total_followers.to_string()),
            ("total_following", stats.total_following.to_string()),
            ("total_activity", stats.total_activity.to_string()),
            (
                "thread_posts_comments_count",
                stats.thread_posts_comments_count.to_string(),
            ),
            ("total_reviews", stats.total_reviews.to_string()),
        ],
    )?;

    let css = default_stylesheet(colors, RingStyle::default())?;
    inline_styles(&svg, &css)
}

fn header_text(username: &str, format: MediaFormat, kind: ItemKind) -> String {
    format!("{username}'s Top {} {}", format.label(), kind.label())
}

pub fn extra_stats(
    items: &[TopItem],
    username: &str,
    format: MediaFormat,
    kind: ItemKind,
    colors: &CardColors,
) -> Result<String, RenderError> {
    let header = header_text(username, format, kind);
    let font_size = calculate_font_size(&header, HEADER_FONT_SIZE, HEADER_MAX_WIDTH);

    let rows = items
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, item)| {
            let i = i as u32;
            format!(
                concat!(
                    "      <g class=\"stagger\" style=\"animation-delay: {delay}ms\" ",
                    "transform=\"translate(25, {y})\">\n",
                    "        <text class=\"stat bold\" y=\"12.5\">{name}:</text>\n",
                    "        <text class=\"stat\" x=\"199.01\" y=\"12.5\">{count}</text>\n",
                    "      </g>"
                ),
                delay = 450 + i * ROW_DELAY_MS,
                y = i * ROW_HEIGHT,
                name = escape_xml(&item.name),
                count = item.count,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let svg = fill(
        EXTRA_STATS_SVG,
        &[
            ("header", escape_xml(&header)),
            ("header_font_size", font_size.to_string()),
            ("rows", rows),
        ],
    )?;

    let css = default_stylesheet(colors, RingStyle::default())?;
    inline_styles(&svg, &css)
}
