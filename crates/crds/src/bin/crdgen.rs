//! Prints the Contour CRD manifest as YAML.
//!
//! Usage: `cargo run -p crds --bin crdgen > config/crd/contour.yaml`

use crds::Contour;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&Contour::crd())?);
    Ok(())
}
