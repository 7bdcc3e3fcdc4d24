use delve_populate::{SpawnRecord, SpawnStats};
use std::fmt;

/// Human-readable rendering of a spawn record tree.
///
/// One line per record, indented by depth, followed by the aggregate
/// [`SpawnStats`].
pub struct SpawnReport<'a> {
    record: &'a SpawnRecord,
    stats: SpawnStats,
}

impl<'a> SpawnReport<'a> {
    pub fn new(record: &'a SpawnRecord) -> Self {
        Self {
            record,
            stats: record.stats(),
        }
    }

    pub fn stats(&self) -> &SpawnStats {
        &self.stats
    }

    /// The tree lines without the stats footer.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.record.visit(&mut |r, depth| {
            let mut line = format!(
                "{:indent$}{} sprites={} coords={}",
                "",
                r.pop,
                r.sprites,
                r.coords,
                indent = depth * 2
            );
            if !r.entities.is_empty() {
                let ids: Vec<String> = r.entities.iter().map(ToString::to_string).collect();
                line.push_str(&format!(" [{}]", ids.join(" ")));
            }
            out.push(line);
        });
        out
    }
}

impl fmt::Display for SpawnReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        let s = &self.stats;
        writeln!(
            f,
            "Spawned {} sprites over {} coords ({} records, depth {})",
            s.sprites, s.coords, s.records, s.max_depth
        )?;
        for (pop, n) in &s.by_pop {
            writeln!(f, "  {pop}: {n}")?;
        }
        Ok(())
    }
}
