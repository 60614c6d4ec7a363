use crate::reports;
use drillrank::error::DrResult;
use drillrank::presets::builtin_presets;

pub fn run() -> DrResult<()> {
    reports::print_presets_table(&builtin_presets());
    Ok(())
}
