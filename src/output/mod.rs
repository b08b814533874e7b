pub mod formatter;

pub use formatter::{
    format_age, format_brand_fit, format_breakdown, format_followers, format_history,
    format_influencer_detail, format_leaderboard, format_score, format_tsv,
    format_weight_profile, should_use_colors,
};
