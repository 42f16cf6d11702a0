//! Release signing: detached signature plus clear-signed combined document.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::command::{remove_if_exists, run_tool, run_tool_with_cleanup};
use crate::error::Result;

/// Plain release descriptor file name.
pub const RELEASE: &str = "Release";
/// Detached signature file name.
pub const RELEASE_GPG: &str = "Release.gpg";
/// Clear-signed combined descriptor file name.
pub const INRELEASE: &str = "InRelease";
/// Transient intermediate used while building the combined descriptor.
pub const INRELEASE_TMP: &str = "InRelease.tmp";

/// Header prepended to the descriptor body in the combined document.
const CLEARSIGN_HEADER: &[u8] = b"Hash: SHA256\n\n";

/// Sign the plain `Release` descriptor in `dist_dir`.
///
/// With no key the descriptor is left unsigned and a warning is emitted
/// (unless `quiet`); an unsigned repository is a legitimate deliverable.
/// With a key, two signing invocations produce the detached signature and
/// the clear-signed combined document. If any sub-step fails, every file
/// created during the attempt is removed, including the transient
/// intermediate; the plain descriptor is always left intact since it is
/// independently valid.
pub(crate) fn sign_release(
    signer: &Path,
    gpgkey: Option<&str>,
    dist_dir: &Path,
    quiet: bool,
) -> Result<()> {
    let Some(key) = gpgkey else {
        if !quiet {
            warn!("no signing key supplied, release descriptor left unsigned");
        }
        return Ok(());
    };

    let release = dist_dir.join(RELEASE);
    let release_gpg = dist_dir.join(RELEASE_GPG);
    let inrelease = dist_dir.join(INRELEASE);
    let intermediate = dist_dir.join(INRELEASE_TMP);

    info!("signing {} with key {}", release.display(), key);

    run_tool_with_cleanup(
        signer,
        sign_args(key, "--detach-sign", &release_gpg, &release),
        dist_dir,
        &release_gpg,
    )?;

    if let Err(err) = clearsign(signer, key, &release, &intermediate, &inrelease, dist_dir) {
        remove_if_exists(&intermediate);
        remove_if_exists(&inrelease);
        remove_if_exists(&release_gpg);
        return Err(err);
    }

    remove_if_exists(&intermediate);
    Ok(())
}

/// Build the combined document: the descriptor body prefixed with the hash
/// header, clear-signed into its final location.
fn clearsign(
    signer: &Path,
    key: &str,
    release: &Path,
    intermediate: &Path,
    inrelease: &Path,
    dist_dir: &Path,
) -> Result<()> {
    let mut combined = CLEARSIGN_HEADER.to_vec();
    combined.extend(fs::read(release)?);
    fs::write(intermediate, combined)?;

    run_tool(
        signer,
        sign_args(key, "--clearsign", inrelease, intermediate),
        dist_dir,
    )?;
    Ok(())
}

fn sign_args(key: &str, mode: &str, output: &Path, input: &Path) -> Vec<OsString> {
    vec![
        OsString::from("--armor"),
        OsString::from("--sign"),
        OsString::from("--local-user"),
        OsString::from(key),
        OsString::from(mode),
        OsString::from("--output"),
        output.as_os_str().to_os_string(),
        input.as_os_str().to_os_string(),
    ]
}
