use crate::app::{AppContext, FlickfeedError, Result};
use crate::connectivity::error_message;
use crate::domain::ImageItem;

pub async fn search(ctx: &AppContext, query: &str, json: bool) -> Result<()> {
    let query = (!query.is_empty()).then(|| query.to_string());

    let items = match ctx.search.run(query).await {
        Ok(items) => items,
        Err(e) => {
            return Err(FlickfeedError::Other(error_message(
                &e.to_string(),
                ctx.probe.as_ref(),
            )))
        }
    };

    if json {
        let out = serde_json::to_string_pretty(&items)
            .map_err(|e| FlickfeedError::Other(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    for item in &items {
        println!("{}", format_item(item));
    }
    println!("{} images", items.len());

    Ok(())
}

fn format_item(item: &ImageItem) -> String {
    format!(
        "{}  {}\n  by {}\n  {}",
        item.published_at,
        item.display_title(),
        item.display_author(),
        item.image_link
    )
}
