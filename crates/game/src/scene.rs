//! The solar system's drawables and their construction from seeds.

use crate::config::SeedConfig;
use crate::spaceship::Spaceship;
use procgen::{
    uv_sphere, AsteroidField, CelestialBody, CelestialField, FieldLayout, MeshError, DEFAULT_SECTORS,
    DEFAULT_STACKS,
};
use renderer::{MeshUploader, ModelData, PointLight, ShadingContext, Vertex};

fn draw_body<C>(ctx: &mut C, body: &CelestialBody, mesh: &C::Mesh)
where
    C: ShadingContext + ?Sized,
{
    ctx.set_mat4("model", body.model_matrix());
    ctx.set_vec3("objectColor", body.color);
    ctx.draw(mesh);
}

/// Planets and stars, all drawn with one shared sphere mesh.
///
/// Each star also contributes a point light.
pub struct SphereField<M> {
    mesh: M,
    planets: CelestialField,
    stars: CelestialField,
    point_lights: Vec<PointLight>,
}

impl<M> SphereField<M> {
    pub fn new<U>(uploader: &mut U, planets: CelestialField, stars: CelestialField) -> Result<Self, MeshError>
    where
        U: MeshUploader<Mesh = M> + ?Sized,
    {
        let sphere = uv_sphere(DEFAULT_STACKS, DEFAULT_SECTORS)?;
        let mesh = uploader.upload_mesh("Sphere", Vertex::slice_from_floats(&sphere.vertices), sphere.indices.as_deref());
        let point_lights = stars
            .bodies
            .iter()
            .map(|star| PointLight::from_star(star.position, star.color))
            .collect();
        Ok(Self {
            mesh,
            planets,
            stars,
            point_lights,
        })
    }

    pub fn planets(&self) -> &CelestialField {
        &self.planets
    }

    pub fn stars(&self) -> &CelestialField {
        &self.stars
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    /// Stars first with `star` set, then planets with it cleared.
    pub fn render<C>(&self, ctx: &mut C)
    where
        C: ShadingContext<Mesh = M> + ?Sized,
    {
        ctx.set_bool("star", true);
        for star in &self.stars.bodies {
            draw_body(ctx, star, &self.mesh);
        }
        ctx.set_bool("star", false);
        for planet in &self.planets.bodies {
            draw_body(ctx, planet, &self.mesh);
        }
    }
}

/// Asteroids, each with its own uploaded hull.
pub struct AsteroidBelt<M> {
    seed: u64,
    asteroids: Vec<(CelestialBody, M)>,
}

impl<M> AsteroidBelt<M> {
    pub fn new<U>(uploader: &mut U, field: &AsteroidField) -> Self
    where
        U: MeshUploader<Mesh = M> + ?Sized,
    {
        let asteroids = field
            .asteroids
            .iter()
            .enumerate()
            .map(|(i, asteroid)| {
                let vertices = Vertex::slice_from_floats(&asteroid.hull.vertices);
                let mesh = uploader.upload_mesh(&format!("Asteroid {i}"), vertices, asteroid.hull.indices.as_deref());
                (asteroid.body, mesh)
            })
            .collect();
        Self {
            seed: field.seed,
            asteroids,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn render<C>(&self, ctx: &mut C)
    where
        C: ShadingContext<Mesh = M> + ?Sized,
    {
        ctx.set_bool("star", false);
        for (body, mesh) in &self.asteroids {
            draw_body(ctx, body, mesh);
        }
    }
}

/// Everything the scene draws.
pub enum Drawable<M> {
    Spheres(SphereField<M>),
    Asteroids(AsteroidBelt<M>),
    Ship(Spaceship<M>),
}

impl<M> Drawable<M> {
    pub fn render<C>(&self, ctx: &mut C)
    where
        C: ShadingContext<Mesh = M> + ?Sized,
    {
        match self {
            Drawable::Spheres(field) => field.render(ctx),
            Drawable::Asteroids(belt) => belt.render(ctx),
            Drawable::Ship(ship) => ship.render(ctx),
        }
    }
}

/// Ship, spheres and asteroids, in draw order.
pub struct SolarSystem<M> {
    drawables: Vec<Drawable<M>>,
}

impl<M> SolarSystem<M> {
    /// Generate every field from `seeds` and upload all geometry.
    pub fn new<U>(uploader: &mut U, seeds: &SeedConfig, ship_model: &ModelData) -> Result<Self, MeshError>
    where
        U: MeshUploader<Mesh = M> + ?Sized,
    {
        let planets = CelestialField::generate(seeds.planets, &FieldLayout::planets());
        let stars = CelestialField::generate(seeds.stars, &FieldLayout::stars());
        let asteroids = AsteroidField::generate(seeds.asteroids, &FieldLayout::asteroids());
        log::info!(
            "Generated {} planets, {} stars, {} asteroids",
            planets.len(),
            stars.len(),
            asteroids.len()
        );

        let ship = Spaceship::new(uploader, ship_model);
        let spheres = SphereField::new(uploader, planets, stars)?;
        let belt = AsteroidBelt::new(uploader, &asteroids);

        Ok(Self {
            drawables: vec![Drawable::Ship(ship), Drawable::Spheres(spheres), Drawable::Asteroids(belt)],
        })
    }

    pub fn drawables(&self) -> &[Drawable<M>] {
        &self.drawables
    }

    pub fn spaceship(&self) -> Option<&Spaceship<M>> {
        self.drawables.iter().find_map(|d| match d {
            Drawable::Ship(ship) => Some(ship),
            _ => None,
        })
    }

    pub fn spaceship_mut(&mut self) -> Option<&mut Spaceship<M>> {
        self.drawables.iter_mut().find_map(|d| match d {
            Drawable::Ship(ship) => Some(ship),
            _ => None,
        })
    }

    pub fn spheres(&self) -> Option<&SphereField<M>> {
        self.drawables.iter().find_map(|d| match d {
            Drawable::Spheres(field) => Some(field),
            _ => None,
        })
    }

    pub fn asteroids(&self) -> Option<&AsteroidBelt<M>> {
        self.drawables.iter().find_map(|d| match d {
            Drawable::Asteroids(belt) => Some(belt),
            _ => None,
        })
    }

    /// Point lights from every star.
    pub fn point_lights(&self) -> &[PointLight] {
        self.spheres().map(|s| s.point_lights()).unwrap_or(&[])
    }

    pub fn update(&mut self, dt: f32, elapsed: f32) {
        if let Some(ship) = self.spaceship_mut() {
            ship.update(dt, elapsed);
        }
    }

    pub fn render<C>(&self, ctx: &mut C)
    where
        C: ShadingContext<Mesh = M> + ?Sized,
    {
        for drawable in &self.drawables {
            drawable.render(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaceship::tests::box_model;
    use glam::Vec3;
    use renderer::{RecordedMesh, Recorder};

    fn system(rec: &mut Recorder, seeds: &SeedConfig) -> SolarSystem<RecordedMesh> {
        SolarSystem::new(rec, seeds, &box_model(Vec3::ZERO, Vec3::ONE)).unwrap()
    }

    #[test]
    fn sphere_mesh_is_shared() {
        let mut rec = Recorder::new();
        let system = system(&mut rec, &SeedConfig::default());
        // Two ship parts, one sphere, one mesh per asteroid.
        assert_eq!(rec.upload_count(), 2 + 1 + 256);

        rec.clear_frame();
        system.spheres().unwrap().render(&mut rec);
        let draws = rec.draws();
        assert_eq!(draws.len(), 66);
        assert!(draws.iter().all(|d| d.mesh == draws[0].mesh));
        assert!(draws[..2].iter().all(|d| d.star == Some(true)));
        assert!(draws[2..].iter().all(|d| d.star == Some(false)));
    }

    #[test]
    fn stars_become_point_lights() {
        let mut rec = Recorder::new();
        let system = system(&mut rec, &SeedConfig::default());
        let stars = system.spheres().unwrap().stars();
        let lights = system.point_lights();
        assert_eq!(lights.len(), 2);
        for (light, star) in lights.iter().zip(&stars.bodies) {
            assert_eq!(light.position, star.position);
            assert_eq!(light.specular, star.color);
        }
    }

    #[test]
    fn asteroid_geometry_reproduces_from_seed() {
        let seeds = SeedConfig {
            asteroids: 77,
            ..SeedConfig::default()
        };
        let collect = |seeds: &SeedConfig| {
            let mut rec = Recorder::new();
            let system = system(&mut rec, seeds);
            rec.clear_frame();
            system.asteroids().unwrap().render(&mut rec);
            rec.draws().iter().map(|d| (d.model, d.object_color)).collect::<Vec<_>>()
        };
        assert_eq!(collect(&seeds), collect(&seeds));
        assert_ne!(collect(&seeds), collect(&SeedConfig::default()));
    }

    #[test]
    fn asteroid_belt_uploads_each_hull() {
        let field = AsteroidField::generate(9, &FieldLayout::asteroids().with_count(3));
        let mut rec = Recorder::new();
        let belt: AsteroidBelt<RecordedMesh> = AsteroidBelt::new(&mut rec, &field);
        assert_eq!(belt.len(), 3);
        assert_eq!(belt.seed(), 9);

        belt.render(&mut rec);
        let ids: Vec<_> = rec.draws().iter().map(|d| d.mesh).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        for (draw, asteroid) in rec.draws().iter().zip(&field.asteroids) {
            assert_eq!(draw.model, Some(asteroid.body.model_matrix()));
        }
    }

    #[test]
    fn draw_order_is_ship_spheres_asteroids() {
        let mut rec = Recorder::new();
        let system = system(&mut rec, &SeedConfig::default());
        assert!(matches!(system.drawables()[0], Drawable::Ship(_)));
        assert!(matches!(system.drawables()[1], Drawable::Spheres(_)));
        assert!(matches!(system.drawables()[2], Drawable::Asteroids(_)));

        rec.clear_frame();
        system.render(&mut rec);
        assert_eq!(rec.draws().len(), 2 + 66 + 256);
        assert!(rec.draws()[0].label.starts_with("Spaceship"));
        assert_eq!(rec.draws().last().map(|d| d.label.as_str()), Some("Asteroid 255"));
    }
}
