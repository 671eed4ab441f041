//! Reusable test content.

/// Catalog with two targets under the `repo` namespace; `gatk` vendors samtools.
pub const CATALOG_CONFIG: &str = r#"
[catalog]
namespace = "repo"

[catalog.targets.a]

[catalog.targets.b]

[catalog.targets.gatk]
dependencies = ["samtools"]

[export]
jobs = 2
timeout_secs = 30

[convert]
jobs = 2
timeout_secs = 30

[pull]
jobs = 2
timeout_secs = 30
"#;

/// `docker save -o <file> <ref>`: writes a small archive, or fails for any
/// reference listed in `$FAKE_DOCKER_MISSING` (space separated).
pub const FAKE_DOCKER: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "Docker version 0.0.0-fake"
  exit 0
fi
if [ "$1" != "save" ] || [ "$2" != "-o" ]; then
  echo "unexpected arguments: $*" >&2
  exit 64
fi
for missing in $FAKE_DOCKER_MISSING; do
  if [ "$missing" = "$4" ]; then
    echo "Error response from daemon: reference does not exist: $4" >&2
    exit 1
  fi
done
printf 'archive:%s\n' "$4" > "$3"
"#;

/// `apptainer build --force <dest> docker-archive:<tar>` and
/// `apptainer pull --force <dest> docker://<ref>`. Archives or references
/// containing `broken` fail the way an unprivileged build does.
pub const FAKE_APPTAINER: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "apptainer version 0.0.0-fake"
  exit 0
fi
case "$4" in
  *broken*)
    echo "FATAL: could not use fakeroot: no mapping entry found in /etc/subuid" >&2
    exit 255
    ;;
esac
case "$1" in
  build|pull)
    printf 'sif:%s\n' "$4" > "$3"
    ;;
  *)
    echo "unexpected arguments: $*" >&2
    exit 64
    ;;
esac
"#;
