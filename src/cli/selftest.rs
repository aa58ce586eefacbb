use anyhow::Result;

use bmrbscan::labeling;

/// Labeling descriptors exercised by the self-test.
const REFERENCE_DESCRIPTORS: [&str; 3] = [
    "[U-100% 13C; U-100% 15N; 80% 2H]",
    "[U-100% 15N; 80% 2H]",
    "[80% 2H]",
];

/// Parse the reference descriptors and print every block decision
pub fn run() -> Result<()> {
    for descriptor in REFERENCE_DESCRIPTORS {
        println!("descriptor: {descriptor}");
        for (block, nucleus) in labeling::labeling_blocks(descriptor) {
            println!("{:>14} : {}", block, nucleus.as_deref().unwrap_or("-"));
        }
        let nuclei: Vec<String> = labeling::parse_labeling(descriptor).into_iter().collect();
        println!("    parsed set : {{{}}}", nuclei.join(", "));
        println!("---");
    }
    Ok(())
}
