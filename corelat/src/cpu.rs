use anyhow::Result;

/// Number of logical cores in the system.
///
/// Asks the affinity API first and falls back to counting `processor`
/// entries in `/proc/cpuinfo` when it reports nothing, which happens on
/// some stripped-down kernels.
pub fn core_count() -> Result<usize> {
    let count = match core_affinity::get_core_ids() {
        Some(ids) if !ids.is_empty() => ids.len(),
        _ => {
            let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").unwrap_or_default();
            count_cpuinfo_processors(&cpuinfo)
        }
    };
    anyhow::ensure!(count > 0, "no logical cores reported by the system");
    Ok(count)
}

fn count_cpuinfo_processors(cpuinfo: &str) -> usize {
    cpuinfo
        .lines()
        .filter(|line| line.starts_with("processor"))
        .count()
}
