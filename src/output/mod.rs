pub mod formatter;

pub use formatter::{
    format_grade, format_objectives, format_percent, format_required_grade, format_stats,
    format_subject_detail, format_subject_table, format_trend, format_tsv, greeting,
    should_use_colors,
};
