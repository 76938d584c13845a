pub mod bird;
pub mod clear_sky;
pub mod corrections;
pub mod iqbal;
pub mod position;

pub use bird::BirdHulstrom;
pub use clear_sky::{
    AtmosphericParameters, Bras, ClearSkyModel, IrradianceComponents, RyanStolzenbach,
    SkyConditions, SolarMethod,
};
pub use corrections::SolarCorrections;
pub use iqbal::Iqbal;
pub use position::{SiteLocation, SolarPosition, SunTimes};

/// Builds the clear-sky model for a method.
///
/// `turbidity` feeds Bras, `transmission` feeds Ryan-Stolzenbach and the
/// site elevation [m] feeds Ryan-Stolzenbach and Iqbal.
pub fn clear_sky_model(
    method: SolarMethod,
    turbidity: f64,
    transmission: f64,
    site_elevation: f64,
) -> Box<dyn ClearSkyModel> {
    match method {
        SolarMethod::Bras => Box::new(Bras::new(turbidity)),
        SolarMethod::Bird => Box::new(BirdHulstrom::new()),
        SolarMethod::RyanStolzenbach => {
            Box::new(RyanStolzenbach::new(transmission, site_elevation))
        }
        SolarMethod::Iqbal => Box::new(Iqbal::new(site_elevation)),
    }
}
