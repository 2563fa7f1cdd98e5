use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use voxel_atlas::{TextureAtlas, TextureType};
use voxel_common::ViewerConfig;
use voxel_input::{Action, Key, MoveKeys};
use voxel_render::{DebugTextRenderer, FlyCamera, Renderer, model_matrix};

#[derive(Parser)]
#[command(name = "voxel-cli", about = "Headless tools for the voxel viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the texture atlas offset table
    Atlas {
        /// Tile size in pixels (defaults to the configured size)
        #[arg(short, long)]
        tile_size: Option<u32>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Also resolve these raw material ids
        #[arg(long, value_delimiter = ',')]
        lookup: Vec<u32>,
    },
    /// Drive the camera through a scripted input sequence and print the view
    Camera {
        /// Steps, applied in order: `look:X,Y`, `zoom:DY`, `move:KEYS:SECONDS`
        /// where KEYS is any of `w`, `a`, `s`, `d`
        steps: Vec<Step>,
        /// Seconds of cube spin to include in the model matrix
        #[arg(long, default_value = "0")]
        time: f32,
    },
    /// Print the effective configuration as YAML
    Config,
}

/// One scripted camera input.
#[derive(Debug, Clone, PartialEq)]
struct Step {
    action: Action,
    seconds: f32,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected KIND:ARGS, got `{s}`"))?;
        let num = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| format!("bad number `{v}` in `{s}`: {e}"))
        };
        match kind {
            "look" => {
                let (x, y) = rest
                    .split_once(',')
                    .ok_or_else(|| format!("expected look:X,Y, got `{s}`"))?;
                Ok(Step {
                    action: Action::Look {
                        x: num(x)?,
                        y: num(y)?,
                    },
                    seconds: 0.0,
                })
            }
            "zoom" => Ok(Step {
                action: Action::Zoom(num(rest)?),
                seconds: 0.0,
            }),
            "move" => {
                let (letters, secs) = rest
                    .split_once(':')
                    .ok_or_else(|| format!("expected move:KEYS:SECONDS, got `{s}`"))?;
                let mut keys = MoveKeys::default();
                for c in letters.chars() {
                    let key = match c.to_ascii_lowercase() {
                        'w' => Key::Forward,
                        's' => Key::Backward,
                        'a' => Key::Left,
                        'd' => Key::Right,
                        other => return Err(format!("unknown move key `{other}` in `{s}`")),
                    };
                    keys.press(key);
                }
                Ok(Step {
                    action: Action::Move(keys),
                    seconds: num(secs)?,
                })
            }
            other => Err(format!("unknown step kind `{other}`")),
        }
    }
}

fn run_camera(config: &ViewerConfig, steps: &[Step], time: f32) -> String {
    let mut camera = FlyCamera::from_config(&config.camera, config.window.aspect_ratio());
    for step in steps {
        camera.apply(&step.action, step.seconds);
        tracing::debug!(
            "after {:?}: yaw={:.2} pitch={:.2} fov={:.1}",
            step.action,
            camera.yaw(),
            camera.pitch(),
            camera.fov()
        );
    }
    DebugTextRenderer::new().render(&camera.frame_view(), model_matrix(time))
}

fn atlas_table(atlas: &TextureAtlas, lookup: &[u32]) -> String {
    let mut out = format!("tile size: {} px, strip width: {} px\n", atlas.tile_size(), atlas.strip_width());
    for texture in TextureType::ALL {
        let o = atlas.lookup(texture);
        out.push_str(&format!("  {:>2}  {:<12} ({}, {})\n", texture.index(), texture.name(), o.x, o.y));
    }
    for &id in lookup {
        let o = atlas.lookup_raw(id);
        out.push_str(&format!("  id {id} -> ({}, {})\n", o.x, o.y));
    }
    out
}

fn crate_listing() -> String {
    [
        ("common", voxel_common::crate_info()),
        ("atlas", voxel_atlas::crate_info()),
        ("input", voxel_input::crate_info()),
        ("render", voxel_render::crate_info()),
        ("render-wgpu", voxel_render_wgpu::crate_info()),
    ]
    .iter()
    .map(|(area, info)| format!("{area}: {info}\n"))
    .collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("voxel-cli v{}", env!("CARGO_PKG_VERSION"));
            print!("{}", crate_listing());
        }
        Commands::Atlas {
            tile_size,
            json,
            lookup,
        } => {
            let atlas = TextureAtlas::build_default(tile_size.unwrap_or(config.atlas.tile_size));
            if json {
                println!("{}", serde_json::to_string_pretty(&atlas)?);
            } else {
                print!("{}", atlas_table(&atlas, &lookup));
            }
        }
        Commands::Camera { steps, time } => {
            print!("{}", run_camera(&config, &steps, time));
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_look_zoom_and_move() {
        assert_eq!(
            "look:310,200".parse::<Step>().unwrap().action,
            Action::Look { x: 310.0, y: 200.0 }
        );
        assert_eq!("zoom:-2".parse::<Step>().unwrap().action, Action::Zoom(-2.0));

        let step: Step = "move:wd:0.5".parse().unwrap();
        assert_eq!(step.seconds, 0.5);
        let Action::Move(keys) = step.action else {
            panic!("expected move");
        };
        assert!(keys.forward && keys.right && !keys.left && !keys.backward);
    }

    #[test]
    fn rejects_malformed_steps() {
        assert!("spin:1".parse::<Step>().is_err());
        assert!("look:1".parse::<Step>().is_err());
        assert!("move:q:1".parse::<Step>().is_err());
        assert!("zoom:abc".parse::<Step>().is_err());
        assert!("zoom".parse::<Step>().is_err());
    }

    #[test]
    fn scripted_camera_reports_zoom() {
        let steps: Vec<Step> = ["look:300,200", "look:310,200", "zoom:100"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let out = run_camera(&ViewerConfig::default(), &steps, 0.0);
        assert!(out.contains("fov=1.0"));
    }

    #[test]
    fn atlas_table_lists_every_tile_and_lookups() {
        let table = atlas_table(&TextureAtlas::build_default(16), &[1, 9]);
        assert!(table.contains("grass_top    (32, 0)"));
        assert!(table.contains("id 1 -> (16, 0)"));
        assert!(table.contains("id 9 -> (0, 0)"));
    }

    #[test]
    fn info_lists_every_crate() {
        let listing = crate_listing();
        assert_eq!(listing.lines().count(), 5);
        assert!(listing.contains("render-wgpu: voxel-render-wgpu v0.1.0"));
    }

    #[test]
    fn cli_parses_camera_steps() {
        let cli = Cli::try_parse_from(["voxel-cli", "camera", "look:1,2", "move:w:1"]).unwrap();
        let Commands::Camera { steps, .. } = cli.command else {
            panic!("expected camera command");
        };
        assert_eq!(steps.len(), 2);
    }
}
