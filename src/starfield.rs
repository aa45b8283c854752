use bevy::core_pipeline::Skybox;
use bevy::prelude::Plugin;
use bevy::{
    asset::LoadState,
    prelude::*,
    render::render_resource::{Extent3d, TextureDimension, TextureViewDescriptor, TextureViewDimension},
};

use crate::camera::MainCamera;
use crate::error::CubemapError;

const CUBE_FACES: u32 = 6;
const STARFIELD_BRIGHTNESS: f32 = 500.0;

/// Starfield backdrop drawn behind the scene
pub struct StarfieldPlugin {
    /// Image paths: six cube faces or one image
    pub faces: Vec<String>,
}

impl Plugin for StarfieldPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        let mut faces = self.faces.clone();
        // The same picture on every face is loaded once and replicated.
        if faces.windows(2).all(|pair| pair[0] == pair[1]) {
            faces.truncate(1);
        }
        app.add_systems(
            Startup,
            move |mut commands: Commands, asset_server: Res<AssetServer>| {
                if faces.is_empty() {
                    return;
                }
                commands.insert_resource(Cubemap {
                    activated: true,
                    face_handles: faces.iter().map(|path| asset_server.load(path.clone())).collect(),
                    image_handle: None,
                });
            },
        )
        .add_systems(Update, attach_starfield.run_if(resource_exists::<Cubemap>));
    }
}

#[derive(Resource)]
pub struct Cubemap {
    pub activated: bool,
    pub face_handles: Vec<Handle<Image>>,
    /// Assembled cube texture, once every face has loaded
    pub image_handle: Option<Handle<Image>>,
}

/// How a set of loaded images maps onto the six cube faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubemapLayout {
    /// Already a six-layer texture
    Cube,
    /// One image holding six square faces stacked vertically
    Stacked,
    /// One plain image; its centred square is used for every face
    Replicated { side: u32 },
    /// Six separate square faces of equal size
    Faces { side: u32 },
}

/// Decide how `faces` become a cubemap without touching pixel data
pub fn cubemap_layout(faces: &[&Image]) -> Result<CubemapLayout, CubemapError> {
    match faces {
        [image] => {
            let (width, height) = (image.width(), image.height());
            if image.texture_descriptor.array_layer_count() == CUBE_FACES {
                Ok(CubemapLayout::Cube)
            } else if width == 0 || height == 0 {
                Err(CubemapError::MissingData)
            } else if height == width * CUBE_FACES {
                Ok(CubemapLayout::Stacked)
            } else {
                Ok(CubemapLayout::Replicated {
                    side: width.min(height),
                })
            }
        }
        [first, rest @ ..] if faces.len() == CUBE_FACES as usize => {
            let same = |image: &&Image| {
                image.size() == first.size()
                    && image.texture_descriptor.format == first.texture_descriptor.format
                    && image.texture_descriptor.array_layer_count() == 1
            };
            if !same(first) || !rest.iter().all(same) {
                return Err(CubemapError::MismatchedFaces);
            }
            let (width, height) = (first.width(), first.height());
            if width != height || width == 0 {
                return Err(CubemapError::NonSquareFace { width, height });
            }
            Ok(CubemapLayout::Faces { side: width })
        }
        _ => Err(CubemapError::FaceCount(faces.len())),
    }
}

/// Build a cube texture from loaded starfield images
pub fn assemble_cubemap(faces: &[&Image]) -> Result<Image, CubemapError> {
    let mut image = match cubemap_layout(faces)? {
        CubemapLayout::Cube => faces[0].clone(),
        CubemapLayout::Stacked => {
            let mut image = faces[0].clone();
            image
                .reinterpret_stacked_2d_as_array(CUBE_FACES)
                .map_err(|err| CubemapError::Reinterpret(err.to_string()))?;
            image
        }
        CubemapLayout::Replicated { side } => {
            let square = centre_square(faces[0], side)?;
            stack_faces(faces[0], side, square.repeat(CUBE_FACES as usize))?
        }
        CubemapLayout::Faces { side } => {
            let mut data = Vec::new();
            for face in faces {
                data.extend_from_slice(face.data.as_deref().ok_or(CubemapError::MissingData)?);
            }
            stack_faces(faces[0], side, data)?
        }
    };
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Ok(image)
}

/// [`assemble_cubemap`], logging and dropping the starfield on failure
pub fn build_cubemap(faces: &[&Image]) -> Option<Image> {
    match assemble_cubemap(faces) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("Starfield unavailable, using a black background: {}", err);
            None
        }
    }
}

/// Copy the centred `side` x `side` square out of a single-layer image
fn centre_square(image: &Image, side: u32) -> Result<Vec<u8>, CubemapError> {
    let data = image.data.as_deref().ok_or(CubemapError::MissingData)?;
    let (width, height) = (image.width() as usize, image.height() as usize);
    let pixels = width * height;
    if pixels == 0 || data.len() % pixels != 0 {
        return Err(CubemapError::MissingData);
    }
    let pixel_size = data.len() / pixels;
    let side = side as usize;
    let (left, top) = ((width - side) / 2, (height - side) / 2);
    let row = side * pixel_size;

    let mut square = Vec::with_capacity(side * row);
    for y in top..top + side {
        let start = (y * width + left) * pixel_size;
        square.extend_from_slice(&data[start..start + row]);
    }
    Ok(square)
}

/// Six `side` x `side` faces laid out top to bottom, viewed as a cube array
fn stack_faces(template: &Image, side: u32, data: Vec<u8>) -> Result<Image, CubemapError> {
    let mut image = Image::new(
        Extent3d {
            width: side,
            height: side * CUBE_FACES,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        template.texture_descriptor.format,
        template.asset_usage,
    );
    image
        .reinterpret_stacked_2d_as_array(CUBE_FACES)
        .map_err(|err| CubemapError::Reinterpret(err.to_string()))?;
    Ok(image)
}

fn attach_starfield(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut cubemap: ResMut<Cubemap>,
    camera_query: Query<(Entity, Option<&Skybox>), With<MainCamera>>,
) {
    if !cubemap.activated {
        return;
    }

    if cubemap.image_handle.is_none() {
        let handles = cubemap.face_handles.clone();
        for handle in &handles {
            match asset_server.get_load_state(handle.id()) {
                Some(LoadState::Loaded) => {}
                Some(LoadState::Failed(err)) => {
                    warn!("Starfield image failed to load, using a black background: {}", err);
                    cubemap.activated = false;
                    return;
                }
                _ => return,
            }
        }

        let faces: Option<Vec<&Image>> = handles.iter().map(|handle| images.get(handle)).collect();
        let Some(faces) = faces else {
            return;
        };
        let Some(cube) = build_cubemap(&faces) else {
            cubemap.activated = false;
            return;
        };
        cubemap.image_handle = Some(images.add(cube));
    }

    let Some(image) = cubemap.image_handle.clone() else {
        return;
    };
    if let Ok((camera_entity, skybox)) = camera_query.single() {
        if skybox.is_none() {
            commands.entity(camera_entity).insert(Skybox {
                image,
                brightness: STARFIELD_BRIGHTNESS,
                ..default()
            });
            info!("Starfield attached to main camera");
        }
    }
}
