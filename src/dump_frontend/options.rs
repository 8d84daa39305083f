use gumdrop::Options;

#[derive(Options, Debug, Default)]
pub struct AppOptions {
    /// Print this help message
    #[options()]
    help: bool,
    /// The path to the .cdg file to decode
    #[options(free, required)]
    pub cdg_path: String,
    /// The folder the frames are written to
    #[options()]
    pub output_dir: Option<String>,
    /// Seconds of playback between two dumped frames
    #[options()]
    pub interval: Option<f64>,
    /// Only dump the frame at this position (in seconds), may be repeated
    #[options(meta = "SECONDS")]
    pub seek: Vec<f64>,
    /// Present as one full frame update, rather than per block updates
    #[options(no_short)]
    pub full_updates: bool,
    /// Compare the frames against the ones of the previous run
    #[options()]
    pub compare: bool,
    /// Store the output dir, interval and update mode as the new defaults
    #[options(no_short)]
    pub save_defaults: bool,
    /// The maximum log level (off, error, warn, info, debug, trace)
    #[options(default = "info")]
    pub log_level: String,
}
