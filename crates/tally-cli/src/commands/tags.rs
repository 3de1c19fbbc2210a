//! Tag and revenue target command implementations

use anyhow::{Context, Result};
use tally_core::aggregate::TargetStatus;
use tally_core::db::Database;
use tally_core::models::Tag;
use tally_core::Session;

use super::print_json;

/// Resolve a tag argument that is either a numeric ID or a tag name
pub fn resolve_tag_arg(db: &Database, tag: &str) -> Result<Tag> {
    if let Ok(id) = tag.trim().parse::<i64>() {
        if let Some(found) = db.get_tag(id)? {
            return Ok(found);
        }
    }
    db.find_tag_by_name(tag)?
        .ok_or_else(|| anyhow::anyhow!("Tag not found: {}", tag))
}

pub fn cmd_tags_list(db: &Database, json: bool) -> Result<()> {
    let tags = db.list_tags()?;
    if json {
        return print_json(&tags);
    }

    if tags.is_empty() {
        println!("No tags found. Create one with 'tally tags add <name>'.");
        return Ok(());
    }

    println!();
    println!("🏷️  Tags");
    println!("   ─────────────────────────────");
    for tag in &tags {
        let uses = db.count_sales_with_tag(&tag.name)?;
        println!("   {:>4}  {} ({} sales)", tag.id, tag.name, uses);
    }
    Ok(())
}

pub fn cmd_tags_add(db: &Database, name: &str) -> Result<()> {
    let id = db.create_tag(name).context("Failed to create tag")?;
    println!("✅ Created tag '{}' (id: {})", name.trim(), id);
    Ok(())
}

/// Rename through the session's edit tracking so the edit is opened and closed
pub fn cmd_tags_rename(
    db: &Database,
    session: &mut Session,
    tag: &str,
    new_name: &str,
) -> Result<()> {
    let found = resolve_tag_arg(db, tag)?;
    session.begin_tag_edit(found.id)?;
    let relabelled = match session.commit_tag_edit(db, found.id, new_name) {
        Ok(n) => n,
        Err(e) => {
            session.cancel_tag_edit(found.id);
            return Err(e).with_context(|| format!("Failed to rename '{}'", found.name));
        }
    };
    println!(
        "✅ Renamed '{}' to '{}' ({} sales relabelled)",
        found.name,
        new_name.trim(),
        relabelled
    );
    Ok(())
}

pub fn cmd_tags_delete(db: &Database, tag: &str) -> Result<()> {
    let found = resolve_tag_arg(db, tag)?;
    let uses = db.count_sales_with_tag(&found.name)?;
    db.delete_tag(found.id)?;
    println!("✅ Deleted tag '{}'", found.name);
    if uses > 0 {
        println!(
            "   {} sales still carry '{}' and keep reporting under it",
            uses, found.name
        );
    }
    Ok(())
}

pub fn cmd_target_set(db: &Database, amount: f64) -> Result<()> {
    db.set_target_revenue(amount)
        .context("Failed to set target")?;
    println!("✅ Revenue target set to {:.2}", amount);
    Ok(())
}

pub fn cmd_target_show(db: &Database, json: bool) -> Result<()> {
    let status = db.sales_target_status()?;
    if json {
        return print_json(&status);
    }

    println!();
    println!("🎯 Revenue Target");
    println!("   ─────────────────────────────");
    match status {
        TargetStatus::Configured {
            target,
            actual,
            variance,
        } => {
            println!("   Target:   {:.2}", target);
            println!("   Actual:   {:.2}", actual);
            println!("   Variance: {:+.2}", variance);
        }
        TargetStatus::NotConfigured { actual } => {
            println!("   No target set.");
            println!("   Actual:   {:.2}", actual);
        }
    }
    Ok(())
}

pub fn cmd_target_clear(db: &Database) -> Result<()> {
    if db.clear_target_revenue()? {
        println!("✅ Revenue target cleared");
    } else {
        println!("No revenue target was set");
    }
    Ok(())
}
