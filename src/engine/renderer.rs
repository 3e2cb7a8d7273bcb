use wasm_bindgen::prelude::*;
use web_sys::{WebGlRenderingContext, WebGlProgram, WebGlBuffer, WebGlUniformLocation, HtmlCanvasElement, WebGlTexture, HtmlImageElement};
use nalgebra::Matrix4;
use crate::engine::mesh::{Mesh, VERTEX_STRIDE};
use crate::engine::scene::Material;
use wasm_bindgen::JsCast;

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aNormal;
    attribute vec2 aTexCoord;
    uniform mat4 uModel;
    uniform mat4 uViewProjection;
    uniform float uPointSize;
    varying vec3 vNormal;
    varying vec2 vTexCoord;
    varying vec3 vWorldPos;
    void main() {
        vec4 world = uModel * vec4(aPosition, 1.0);
        vWorldPos = world.xyz;
        vNormal = (uModel * vec4(aNormal, 0.0)).xyz;
        vTexCoord = aTexCoord;
        gl_PointSize = uPointSize;
        gl_Position = uViewProjection * world;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vNormal;
    varying vec2 vTexCoord;
    varying vec3 vWorldPos;
    uniform sampler2D uTexture;
    uniform int uUseTexture;
    uniform int uEmissive;
    uniform vec3 uColor;
    uniform float uOpacity;
    uniform vec3 uLightPosition;

    void main() {
        vec3 color = uColor;

        if (uUseTexture == 1) {
            vec4 texColor = texture2D(uTexture, vTexCoord);
            color *= texColor.rgb;
        }

        // Point light at the sun; everything else is ambient
        if (uEmissive == 0) {
            vec3 n = normalize(vNormal);
            vec3 l = normalize(uLightPosition - vWorldPos);
            float diffuse = max(dot(n, l), 0.0);
            color *= 0.15 + 0.85 * diffuse;
        }

        gl_FragColor = vec4(color, uOpacity);
    }
"#;

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    program: WebGlProgram,
    model_location: WebGlUniformLocation,
    view_projection_location: WebGlUniformLocation,
    point_size_location: WebGlUniformLocation,
    color_location: WebGlUniformLocation,
    opacity_location: WebGlUniformLocation,
    emissive_location: WebGlUniformLocation,
    use_texture_location: WebGlUniformLocation,
    dynamic_vertex_buffer: WebGlBuffer,
    dynamic_index_buffer: WebGlBuffer,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let dynamic_vertex_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let dynamic_index_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;

        let uniform = |name: &str| {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| JsValue::from_str(&format!("Failed to get {} location", name)))
        };
        let model_location = uniform("uModel")?;
        let view_projection_location = uniform("uViewProjection")?;
        let point_size_location = uniform("uPointSize")?;
        let color_location = uniform("uColor")?;
        let opacity_location = uniform("uOpacity")?;
        let emissive_location = uniform("uEmissive")?;
        let use_texture_location = uniform("uUseTexture")?;
        let light_location = uniform("uLightPosition")?;

        // The sun sits at the origin for the lifetime of the view
        gl.uniform3f(Some(&light_location), 0.0, 0.0, 0.0);

        Ok(Renderer {
            gl,
            program,
            model_location,
            view_projection_location,
            point_size_location,
            color_location,
            opacity_location,
            emissive_location,
            use_texture_location,
            dynamic_vertex_buffer,
            dynamic_index_buffer,
        })
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn enable_blend(&self) {
        self.gl.enable(WebGlRenderingContext::BLEND);
        self.gl.blend_func(WebGlRenderingContext::SRC_ALPHA, WebGlRenderingContext::ONE_MINUS_SRC_ALPHA);
    }

    pub fn resize(&self, width: i32, height: i32) {
        if let Some(canvas) = self.canvas() {
            canvas.set_width(width.max(0) as u32);
            canvas.set_height(height.max(0) as u32);
        }
        self.gl.viewport(0, 0, width, height);
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.gl.canvas()?.dyn_into::<HtmlCanvasElement>().ok()
    }

    fn bind_attributes(&self, stride: i32) {
        let pos_loc = self.gl.get_attrib_location(&self.program, "aPosition") as u32;
        let normal_loc = self.gl.get_attrib_location(&self.program, "aNormal") as u32;
        let tex_loc = self.gl.get_attrib_location(&self.program, "aTexCoord") as u32;

        self.gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, stride, 0);
        self.gl.enable_vertex_attrib_array(pos_loc);

        if stride == 0 {
            // Tightly packed positions only
            self.gl.disable_vertex_attrib_array(normal_loc);
            self.gl.disable_vertex_attrib_array(tex_loc);
        } else {
            self.gl.vertex_attrib_pointer_with_i32(normal_loc, 3, WebGlRenderingContext::FLOAT, false, stride, 12);
            self.gl.enable_vertex_attrib_array(normal_loc);

            self.gl.vertex_attrib_pointer_with_i32(tex_loc, 2, WebGlRenderingContext::FLOAT, false, stride, 24);
            self.gl.enable_vertex_attrib_array(tex_loc);
        }
    }

    fn set_matrices(&self, model: &Matrix4<f32>, view_projection: &Matrix4<f32>) {
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.model_location), false, model.as_slice());
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.view_projection_location), false, view_projection.as_slice());
    }

    pub fn draw_mesh(&self, mesh: &Mesh, material: &Material, model: &Matrix4<f32>, view_projection: &Matrix4<f32>) {
        if let Some(tex) = &material.texture {
            self.gl.active_texture(WebGlRenderingContext::TEXTURE0);
            self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(tex));
            self.gl.uniform1i(Some(&self.use_texture_location), 1);
        } else {
            self.gl.uniform1i(Some(&self.use_texture_location), 0);
        }

        let (r, g, b) = material.color;
        self.gl.uniform3f(Some(&self.color_location), r, g, b);
        self.gl.uniform1f(Some(&self.opacity_location), material.opacity);
        self.gl.uniform1i(Some(&self.emissive_location), material.emissive as i32);

        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&mesh.vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::STATIC_DRAW
            );
        }

        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.dynamic_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&mesh.indices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::STATIC_DRAW
            );
        }

        self.bind_attributes((VERTEX_STRIDE * 4) as i32);
        self.set_matrices(model, view_projection);

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.indices.len() as i32,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0
        );
    }

    pub fn draw_points(&self, positions: &[f32], size: f32, color: (f32, f32, f32), view_projection: &Matrix4<f32>) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(positions);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW
            );
        }

        self.bind_attributes(0);

        self.gl.uniform1i(Some(&self.use_texture_location), 0);
        self.gl.uniform1i(Some(&self.emissive_location), 1);
        self.gl.uniform1f(Some(&self.opacity_location), 1.0);
        self.gl.uniform1f(Some(&self.point_size_location), size);
        self.gl.uniform3f(Some(&self.color_location), color.0, color.1, color.2);

        self.set_matrices(&Matrix4::identity(), view_projection);

        self.gl.draw_arrays(
            WebGlRenderingContext::POINTS,
            0,
            (positions.len() / 3) as i32
        );
    }

    pub fn create_texture(&self, url: &str) -> Result<WebGlTexture, JsValue> {
        let texture = self.gl.create_texture().ok_or("Failed to create texture")?;
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));

        // Put a single pixel in the texture so we can use it immediately.
        let level = 0;
        let internal_format = WebGlRenderingContext::RGBA as i32;
        let width = 1;
        let height = 1;
        let border = 0;
        let src_format = WebGlRenderingContext::RGBA;
        let src_type = WebGlRenderingContext::UNSIGNED_BYTE;
        let pixel = [255u8, 255, 255, 255];
        self.gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            WebGlRenderingContext::TEXTURE_2D, level, internal_format, width, height, border, src_format, src_type, Some(&pixel)
        )?;

        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));

        let gl = self.gl.clone();
        let texture_clone = texture.clone();
        let img_clone = img.clone();
        let source = url.to_string();

        let onload = Closure::wrap(Box::new(move || {
            gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture_clone));
            if let Err(err) = gl.tex_image_2d_with_u32_and_u32_and_image(
                WebGlRenderingContext::TEXTURE_2D, 0, WebGlRenderingContext::RGBA as i32, WebGlRenderingContext::RGBA, WebGlRenderingContext::UNSIGNED_BYTE, &img_clone
            ) {
                log::warn!("texture upload failed for {}: {:?}", source, err);
                return;
            }

            if is_power_of_2(img_clone.width()) && is_power_of_2(img_clone.height()) {
                gl.generate_mipmap(WebGlRenderingContext::TEXTURE_2D);
            } else {
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_S, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_T, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_MIN_FILTER, WebGlRenderingContext::LINEAR as i32);
            }
        }) as Box<dyn FnMut()>);

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        img.set_src(url);

        Ok(texture)
    }
}

fn is_power_of_2(value: u32) -> bool {
    value != 0 && (value & (value - 1)) == 0
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(JsValue::from_str(&gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<web_sys::WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(JsValue::from_str(&gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_sizes() {
        assert!(is_power_of_2(1024));
        assert!(is_power_of_2(1));
        assert!(!is_power_of_2(0));
        assert!(!is_power_of_2(1000));
    }
}
